use std::fmt;
use std::io::{self, BufRead, Write};

use crate::lib::view::Palette;

/// Line-based interaction with the user
///
/// Generic over its streams so that sessions can be scripted.
pub struct Console<R, W> {
    input: R,
    output: W,
    pub palette: Palette,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, palette: Palette) -> Self {
        Self { input, output, palette }
    }

    /// Show `prompt` and read one line, trimmed
    ///
    /// Running out of input is reported as `UnexpectedEof`.
    pub fn ask<S>(&mut self, prompt: S) -> io::Result<String>
    where
        S: fmt::Display,
    {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim().to_string())
    }

    pub fn say<S>(&mut self, msg: S) -> io::Result<()>
    where
        S: fmt::Display,
    {
        writeln!(self.output, "{}", msg)
    }

    pub fn warn<S>(&mut self, msg: S) -> io::Result<()>
    where
        S: fmt::Display,
    {
        writeln!(self.output, "⚠️ {}", msg)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
