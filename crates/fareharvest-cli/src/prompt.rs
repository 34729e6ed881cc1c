//! Terminal implementation of the lock-release confirmation.

use std::io::{self, BufRead, Write};
use std::path::Path;

use fareharvest_store::OperatorPrompt;

/// Asks on `output` and reads the answer from `input`.
pub(crate) struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> OperatorPrompt for ConsolePrompt<R, W> {
    fn confirm_released(&mut self, path: &Path) -> io::Result<bool> {
        write!(
            self.output,
            "{} IS OPEN! Close the file and confirm [yes]: ",
            path.display()
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for confirmation",
            ));
        }
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y"))
    }
}
