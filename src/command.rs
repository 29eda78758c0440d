use crate::env::Environment;
use crate::error::BuiltinError;
use std::path::PathBuf;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Children killed by a signal are reported as `128 + signal`, mirroring POSIX shells.
pub type ExitCode = i32;

/// Smallest parsed unit of input. Operators are plain tokens with a literal value.
pub type Token = String;

/// Output redirection operator.
pub const REDIRECT: &str = ">";

/// Parallel separator.
pub const PARALLEL: &str = "&";

/// One program invocation with its redirect already extracted.
///
/// `argv[0]` is the program name as typed; `argv` never contains the
/// `>` operator or the redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub redirect: Option<PathBuf>,
}

impl Command {
    /// Name of the program, as it should be looked up on the search path.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }
}

/// Commands that run concurrently, in the order they appeared on the line.
pub type CommandGroup = Vec<Command>;

/// A command bound to the executable it resolved to.
///
/// Each forked child receives exactly one `Job`, so it never has to work out
/// which member of the group it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub command: Command,
    pub executable: PathBuf,
}

/// Object-safe trait for built-ins, executed inside the shell process.
pub trait ExecutableCommand {
    /// Executes the command against the shell context.
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<(), BuiltinError>;
}

/// Factory that tries to create a built-in from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Argument validation failures are still a match: they come back as
/// `Some(Err(_))` so that the line is not handed to the external launcher.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        name: &str,
        args: &[String],
    ) -> Option<Result<Box<dyn ExecutableCommand>, BuiltinError>>;
}
