//! `wish`, a small Unix shell with interactive and batch modes.
//!
//! A line is split into whitespace-separated tokens, with `>` and `&` always
//! standing alone. `cmd args > file` sends a command's stdout and stderr to
//! `file`; `cmd1 & cmd2 &` runs commands concurrently. The shell waits for the
//! whole group before reading the next line. `exit`, `path` and `cd` are built in.
//!
//! The main entry point is [`Interpreter`], which runs lines against its
//! [`Environment`] and reports every error through an [`ErrorSink`]. Lines come
//! from a [`LineSource`]: [`Interactive`] for a terminal or [`Batch`] for a file.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod io_adapters;
mod lexer;
mod parser;
mod process;

pub use env::Environment;
pub use error::{ERROR_MESSAGE, ErrorSink, ShellError, StderrSink};
pub use external::find_command_path;
pub use interpreter::{Interpreter, LineOutcome};
pub use io_adapters::{Batch, Interactive, LineSource};
pub use lexer::split_into_tokens;
