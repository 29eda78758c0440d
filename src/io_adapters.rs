use crate::error::ShellError;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Prompt shown before every interactive line.
pub const PROMPT: &str = "wish> ";

/// Where the shell gets its next line from.
///
/// `Ok(None)` means the input is exhausted and the shell should exit successfully.
/// An error that downcasts to [`ShellError`] only spoils the current line.
pub trait LineSource {
    /// Read one line, without its trailing newline.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Terminal input with line editing and history.
pub struct Interactive {
    editor: DefaultEditor,
}

impl Interactive {
    /// Set up the line editor on the controlling terminal.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("can't initialise line editor")?;
        Ok(Self { editor })
    }
}

impl LineSource for Interactive {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C drops the line being edited, like other shells.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Lines read from a script, one command line per text line.
pub struct Batch<R> {
    reader: R,
    line_no: usize,
}

impl Batch<BufReader<File>> {
    /// Open a batch file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Batch<R> {
    /// Read command lines from any buffered reader.
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }
}

impl<R: BufRead> LineSource for Batch<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        while buf.last().is_some_and(|b| matches!(b, b'\n' | b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8(buf).map_err(|_| ShellError::InvalidUtf8(self.line_no))?;
        Ok(Some(line))
    }
}
