use std::env as stdenv;
use std::path::PathBuf;

/// Search path every shell starts with.
pub const DEFAULT_SEARCH_PATH: &[&str] = &["/bin"];

/// Mutable shell context threaded through the dispatcher and the resolver.
///
/// The environment contains:
/// - `search_path`: ordered directories consulted to resolve command names.
/// - `current_dir`: mirror of the process working directory, only updated by `cd`.
/// - `should_exit`: a flag that the read loop checks to know when to terminate.
///
/// The working directory itself is process-wide OS state. The `cd` built-in is
/// its sole owner; children inherit it at fork time.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Directories searched in order; replaced wholesale by `path`.
    pub search_path: Vec<String>,
    /// The working directory children are started in.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the read loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current working directory and start from [`DEFAULT_SEARCH_PATH`].
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            search_path: DEFAULT_SEARCH_PATH.iter().map(|d| d.to_string()).collect(),
            current_dir,
            should_exit: false,
        }
    }

    /// Replace the whole search path. An empty list disables external commands.
    pub fn set_search_path<I, S>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_path = dirs.into_iter().map(Into::into).collect();
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_env_starts_with_bin() {
        let env = Environment::new();
        assert_eq!(env.search_path, vec!["/bin".to_string()]);
        assert!(!env.should_exit);
    }

    #[test]
    fn test_set_search_path_replaces_everything() {
        let mut env = Environment::new();
        env.set_search_path(["/usr/bin", "/usr/local/bin"]);
        assert_eq!(env.search_path, vec!["/usr/bin", "/usr/local/bin"]);

        env.set_search_path(Vec::<String>::new());
        assert!(env.search_path.is_empty());
    }
}
