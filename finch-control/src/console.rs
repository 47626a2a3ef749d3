//! Line based operator I/O with the configured colours.

use std::fmt::Display;
use std::io::{BufRead, Write};

use color_eyre::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

pub struct Console<R, W> {
    input: R,
    output: W,
    foreground: Color,
    background: Color,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, (foreground, background): (Color, Color)) -> Self {
        Self {
            input,
            output,
            foreground,
            background,
        }
    }

    pub fn set_theme(&mut self, (foreground, background): (Color, Color)) {
        self.foreground = foreground;
        self.background = background;
    }

    /// Clear the screen and print a screen title.
    pub fn header(&mut self, title: &str) -> Result<()> {
        queue!(
            self.output,
            SetForegroundColor(self.foreground),
            SetBackgroundColor(self.background),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        writeln!(self.output)?;
        writeln!(self.output, "\t\t{title}")?;
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "\t{text}")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Print `text` and read one trimmed line; `None` at end of input.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "\t{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn continue_prompt(&mut self) -> Result<()> {
        self.blank()?;
        self.prompt("Press Enter to continue.")?;
        Ok(())
    }

    pub fn menu_prompt(&mut self, menu: &str) -> Result<()> {
        self.blank()?;
        self.prompt(&format!("Press Enter to return to the {menu} Menu."))?;
        Ok(())
    }

    /// Put the terminal colours back the way we found them.
    pub fn reset(&mut self) -> Result<()> {
        queue!(self.output, ResetColor)?;
        self.output.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
