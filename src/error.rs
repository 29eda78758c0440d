//! Error types and the uniform diagnostic.
//!
//! Every detectable error is reported to the user with the same fixed
//! message; the typed variants exist for logging and for tests.

use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// The only diagnostic the user ever sees.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Syntax errors for `&` and `>` placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// The line starts with `&`.
    #[error("empty command before '&'")]
    LeadingSeparator,
    /// Two `&` next to each other.
    #[error("empty command between '&' separators")]
    EmptyCommand,
    /// A `>` without a program before it or not followed by exactly one target.
    #[error("misplaced '>' in command {0}")]
    MisplacedRedirect(usize),
    /// More than one `>` in a single command.
    #[error("more than one '>' in command {0}")]
    MultipleRedirects(usize),
}

/// Misuse or failure of a built-in.
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("exit: expected no arguments, got {0}")]
    ExitArguments(usize),
    #[error("cd: expected exactly one argument, got {0}")]
    CdArity(usize),
    #[error("cd: can't chdir to {target}: {source}")]
    CdFailed {
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Umbrella error for everything the shell can run into while handling a line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParsingError),
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error(transparent)]
    Builtin(#[from] BuiltinError),
    #[error("argument contains an interior NUL byte: {0:?}")]
    InvalidArgument(String),
    #[error("fork failed for {program}: {source}")]
    Fork {
        program: String,
        #[source]
        source: nix::Error,
    },
    #[error("waiting for child {pid} failed: {source}")]
    Wait {
        pid: i32,
        #[source]
        source: nix::Error,
    },
    #[error("can't open batch file {path}: {source}")]
    BatchFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("usage: wish [batch-file]")]
    Usage,
    #[error("reading input failed: {0}")]
    Input(String),
    /// A batch line that isn't valid UTF-8. The line is skipped.
    #[error("line {0} is not valid UTF-8")]
    InvalidUtf8(usize),
}

/// Destination for recoverable errors.
pub trait ErrorSink {
    /// Record or display one error.
    fn report(&mut self, error: &ShellError);
}

/// Writes [`ERROR_MESSAGE`] to standard error for every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn report(&mut self, error: &ShellError) {
        debug!(%error, "reporting error");
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(ERROR_MESSAGE.as_bytes());
        let _ = stderr.flush();
    }
}

/// Write the diagnostic from inside a forked child.
///
/// Goes straight to fd 2 with a single `write(2)`, without taking the std
/// stderr lock, which another thread of the parent may have held at fork time.
pub(crate) fn report_from_child() {
    let _ = nix::unistd::write(io::stderr(), ERROR_MESSAGE.as_bytes());
}

/// Test sink that keeps the message of every reported error.
#[cfg(test)]
pub(crate) struct RecordingSink {
    reports: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

#[cfg(test)]
impl RecordingSink {
    /// Create a sink and return a handle to read the recorded messages later.
    pub(crate) fn with_handle() -> (Self, std::rc::Rc<std::cell::RefCell<Vec<String>>>) {
        let reports = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        (
            Self {
                reports: reports.clone(),
            },
            reports,
        )
    }
}

#[cfg(test)]
impl ErrorSink for RecordingSink {
    fn report(&mut self, error: &ShellError) {
        self.reports.borrow_mut().push(error.to_string());
    }
}
