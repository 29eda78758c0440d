use crate::builtin;
use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use crate::error::{ErrorSink, ShellError, StderrSink};
use crate::external::resolve_group;
use crate::io_adapters::LineSource;
use crate::lexer;
use crate::parser;
use crate::process;
use tracing::debug;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports built-ins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// What handling one line amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Nothing but whitespace.
    Blank,
    /// A built-in ran in the shell process.
    Builtin,
    /// A group was launched; exit status of each spawned child, in group order.
    Group(Vec<ExitCode>),
}

/// A minimal shell that runs built-ins in-process and external commands as children.
///
/// The interpreter maintains an [`Environment`] and a list of [`CommandFactory`] objects
/// for the built-ins. Every recoverable error goes to its [`ErrorSink`].
///
/// Example
/// ```no_run
/// use wish::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.execute_line("path /bin /usr/bin");
/// sh.execute_line("echo hello > /tmp/hello.txt & ls");
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
    sink: Box<dyn ErrorSink>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of built-ins and error sink.
    pub fn new(builtins: Vec<Box<dyn CommandFactory>>, sink: Box<dyn ErrorSink>) -> Self {
        Self {
            env: Environment::new(),
            builtins,
            sink,
        }
    }

    /// Create an interpreter with the default built-ins reporting to `sink`.
    pub fn with_sink(sink: Box<dyn ErrorSink>) -> Self {
        Self::new(builtin::default_factories(), sink)
    }

    /// The shell context: search path, working directory and exit flag.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Whether `exit` has been run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Interpret one line: tokenize, dispatch built-ins, split, validate,
    /// resolve, then run the group and wait for all of it.
    ///
    /// Errors before forking mean nothing was spawned. Errors after forking are
    /// reported to the sink directly and the rest of the group carries on.
    pub fn run_line(&mut self, line: &str) -> Result<LineOutcome, ShellError> {
        let Some(tokens) = lexer::split_into_tokens(line) else {
            return Ok(LineOutcome::Blank);
        };
        debug!(?tokens, "tokenized line");

        if builtin::dispatch(&self.builtins, &mut self.env, &tokens)? {
            return Ok(LineOutcome::Builtin);
        }

        let group = parser::construct_group(tokens)?;
        debug!(?group, "parsed command group");

        let jobs = resolve_group(&self.env.search_path, group)?;
        debug!(?jobs, "resolved executables");

        let codes = process::run_group(&jobs, self.sink.as_mut())?;
        Ok(LineOutcome::Group(codes))
    }

    /// Like [`Interpreter::run_line`], but reports the error to the sink instead of
    /// returning it.
    pub fn execute_line(&mut self, line: &str) -> Option<LineOutcome> {
        match self.run_line(line) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.sink.report(&err);
                None
            }
        }
    }

    /// Read and run lines until the source is exhausted or `exit` runs.
    ///
    /// A [`ShellError`] from the source is reported and the line skipped; any
    /// other error ends the loop.
    pub fn run(&mut self, source: &mut dyn LineSource) -> anyhow::Result<()> {
        while !self.env.should_exit {
            let line = match source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("end of input");
                    break;
                }
                Err(err) => {
                    self.sink.report(&err.downcast::<ShellError>()?);
                    continue;
                }
            };
            self.execute_line(&line);
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default built-ins:
    /// `exit`, `path`, `cd`, reporting to standard error.
    fn default() -> Self {
        Self::with_sink(Box::new(StderrSink))
    }
}
