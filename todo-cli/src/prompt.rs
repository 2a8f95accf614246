use anyhow::Result;
use std::io::{BufRead, Write};

/// Raised when input ends mid-prompt; the menu loop treats it as exit.
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
pub struct InputClosed;

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print `label` without a newline and read one line with the line ending stripped.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{}", label)?;
        self.out.flush().ok();
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(s.trim().to_string())
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
