use crate::command::{CommandFactory, ExecutableCommand, Token};
use crate::env::Environment;
use crate::error::{BuiltinError, ShellError};
use crate::interpreter::Factory;
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in the shell process itself, are never forked, and never take
/// part in `&` groups or `>` redirection.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Validates the arguments following the command name.
    fn from_args(args: &[String]) -> Result<Self, BuiltinError>;

    /// Executes the command against the shell context.
    fn execute(self, env: &mut Environment) -> Result<(), BuiltinError>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<(), BuiltinError> {
        T::execute(*self, env)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        name: &str,
        args: &[String],
    ) -> Option<Result<Box<dyn ExecutableCommand>, BuiltinError>> {
        if name == T::name() {
            Some(T::from_args(args).map(|cmd| Box::new(cmd) as Box<dyn ExecutableCommand>))
        } else {
            None
        }
    }
}

/// Run the line as a built-in if its first token names one.
///
/// Returns `Ok(true)` when a built-in handled the line, `Ok(false)` when the
/// line should go on to group splitting and process launch. An `Err` also
/// means the line was consumed by a built-in.
pub(crate) fn dispatch(
    factories: &[Box<dyn CommandFactory>],
    env: &mut Environment,
    tokens: &[Token],
) -> Result<bool, ShellError> {
    let Some((name, args)) = tokens.split_first() else {
        return Ok(false);
    };

    for factory in factories {
        if let Some(created) = factory.try_create(name, args) {
            debug!(builtin = %name, ?args, "running builtin");
            created?.execute(env)?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Leave the shell with success status.
///
/// Extra arguments are reported, but the shell still exits.
pub struct Exit {
    pub extra_args: usize,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(args: &[String]) -> Result<Self, BuiltinError> {
        Ok(Self {
            extra_args: args.len(),
        })
    }

    fn execute(self, env: &mut Environment) -> Result<(), BuiltinError> {
        env.should_exit = true;
        if self.extra_args > 0 {
            return Err(BuiltinError::ExitArguments(self.extra_args));
        }
        Ok(())
    }
}

/// Replace the search path with the given directories, in order.
///
/// With no directories the search path becomes empty and only built-ins work.
pub struct Path {
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    fn from_args(args: &[String]) -> Result<Self, BuiltinError> {
        Ok(Self {
            dirs: args.to_vec(),
        })
    }

    fn execute(self, env: &mut Environment) -> Result<(), BuiltinError> {
        env.set_search_path(self.dirs);
        Ok(())
    }
}

/// Change the current working directory.
///
/// Takes exactly one target, absolute or relative to the current directory.
/// This is the only place the process working directory is changed.
pub struct Cd {
    pub target: PathBuf,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[String]) -> Result<Self, BuiltinError> {
        match args {
            [target] => Ok(Self {
                target: PathBuf::from(target),
            }),
            _ => Err(BuiltinError::CdArity(args.len())),
        }
    }

    fn execute(self, env: &mut Environment) -> Result<(), BuiltinError> {
        env::set_current_dir(&self.target).map_err(|source| BuiltinError::CdFailed {
            target: self.target.clone(),
            source,
        })?;
        env.current_dir = env::current_dir().unwrap_or(self.target);
        Ok(())
    }
}

/// Built-ins every interpreter starts with.
pub(crate) fn default_factories() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Path>::default()),
        Box::new(Factory::<Cd>::default()),
    ]
}
