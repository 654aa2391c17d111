/// Interactive prompt for a directory and a large-file threshold.
///
/// Generic over its input and output so the loop can be driven from
/// tests with in-memory buffers.
use filesleuth_core::model::size::parse_size;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Entering this instead of a directory ends the session.
pub const EXIT_COMMAND: &str = "1";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Scan { directory: PathBuf, threshold: u64 },
    Exit,
}

pub struct Prompt<R, W> {
    input: R,
    output: W,
    default_threshold: u64,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W, default_threshold: u64) -> Self {
        Self {
            input,
            output,
            default_threshold,
        }
    }

    /// Ask until the answers are valid. End of input counts as exit.
    pub fn next_request(&mut self) -> io::Result<Request> {
        loop {
            let Some(directory) = self.ask("Enter the directory to analyze: ")? else {
                return Ok(Request::Exit);
            };
            if directory == EXIT_COMMAND {
                return Ok(Request::Exit);
            }
            let directory = PathBuf::from(directory);
            if !directory.is_dir() {
                self.reject("Directory does not exist")?;
                continue;
            }

            let question = format!(
                "Enter size threshold for large files (bytes or e.g. 100M, default {}): ",
                self.default_threshold
            );
            let Some(answer) = self.ask(&question)? else {
                return Ok(Request::Exit);
            };
            let threshold = if answer.is_empty() {
                self.default_threshold
            } else if let Some(bytes) = parse_size(&answer) {
                bytes
            } else {
                self.reject(&format!("Invalid size threshold '{answer}'"))?;
                continue;
            };

            return Ok(Request::Scan {
                directory,
                threshold,
            });
        }
    }

    /// Print `question` and read one trimmed line; `None` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn reject(&mut self, reason: &str) -> io::Result<()> {
        writeln!(self.output, "Error: {reason}. Please try again.")
    }
}
