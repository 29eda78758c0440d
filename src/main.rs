use argh::{EarlyExit, FromArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wish::{Batch, ErrorSink, Interactive, Interpreter, LineSource, ShellError, StderrSink};

#[derive(FromArgs)]
/// A small Unix shell. Reads commands from the terminal, or from a batch file when one is given.
struct Args {
    #[argh(positional)]
    /// file to read commands from, one line at a time; at most one.
    batch_file: Vec<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WISH_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args() -> Result<Args, ExitCode> {
    let argv: Vec<String> = std::env::args().collect();
    let strs: Vec<&str> = argv.iter().map(String::as_str).collect();
    let (cmd, rest) = strs.split_first().map_or(("wish", &[][..]), |(c, r)| (*c, r));

    // A lone argument is always the batch file, even if it looks like a flag.
    if let [file] = rest {
        if *file != "--help" {
            return Ok(Args {
                batch_file: vec![PathBuf::from(*file)],
            });
        }
    }

    match Args::from_args(&[cmd], rest) {
        Ok(args) => Ok(args),
        Err(EarlyExit { output, status }) => match status {
            Ok(()) => {
                println!("{output}");
                Err(ExitCode::SUCCESS)
            }
            Err(()) => {
                StderrSink.report(&ShellError::Usage);
                Err(ExitCode::FAILURE)
            }
        },
    }
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };

    let mut source: Box<dyn LineSource> = match args.batch_file.as_slice() {
        [] => match Interactive::new() {
            Ok(editor) => Box::new(editor),
            Err(err) => {
                StderrSink.report(&ShellError::Input(format!("{err:#}")));
                return ExitCode::FAILURE;
            }
        },
        [path] => match Batch::open(path) {
            Ok(batch) => Box::new(batch),
            Err(source) => {
                StderrSink.report(&ShellError::BatchFile {
                    path: path.clone(),
                    source,
                });
                return ExitCode::FAILURE;
            }
        },
        _ => {
            StderrSink.report(&ShellError::Usage);
            return ExitCode::FAILURE;
        }
    };

    let mut shell = Interpreter::default();
    match shell.run(source.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            StderrSink.report(&ShellError::Input(format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}
