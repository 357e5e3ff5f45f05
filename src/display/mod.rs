#![warn(clippy::all, clippy::pedantic)]

use crate::{
    dispatch::{Builtin, BuiltinHost},
    error::Result,
    index::CommandIndex,
};
use colored::Colorize;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::Write;

/// Number of columns used by the `list` built-in
pub const LIST_COLUMNS: usize = 4;

const BANNER: &str = r"
 ____  _    _ _____ __  __  _____ _    _
|  _ \| |  | |_   _|  \/  |/ ____| |  | |
| | | | |  | | | | | \  / | (___ | |__| |
| | | | |/\| | | | | |\/| |\___ \|  __  |
| |_| \  /\  /_| |_| |  | |____) | |  | |
|____/ \/  \/|_____|_|  |_|_____/|_|  |_|
";

/// Carries out built-in actions on a terminal-like writer.
///
/// Keeps its own copy of the line history so `history` can be served
/// without reaching into the line editor.
pub struct TerminalHost<W: Write> {
    out: W,
    history: Vec<String>,
    history_limit: usize,
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W, history_limit: usize) -> Self {
        Self {
            out,
            history: Vec::new(),
            history_limit,
        }
    }

    #[must_use]
    pub fn history_entries(&self) -> &[String] {
        &self.history
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// # Errors
    ///
    /// Returns an error if the writer fails
    pub fn banner(&mut self) -> Result<()> {
        writeln!(self.out, "{}", BANNER.green())?;
        writeln!(self.out, "{}", "Do What I Mean Shell".green())?;
        writeln!(
            self.out,
            "{}\n",
            "Type 'help' for available commands or 'exit' to quit".yellow()
        )?;
        Ok(())
    }
}

impl<W: Write> BuiltinHost for TerminalHost<W> {
    fn help(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}\n", "DWIMSH - Do What I Mean Shell".bold())?;
        writeln!(self.out, "Built-in commands:")?;
        for builtin in Builtin::ALL {
            writeln!(
                self.out,
                "  {:<14}- {}",
                builtin.name().bold(),
                builtin.description()
            )?;
        }
        writeln!(self.out, "\nFeatures:")?;
        writeln!(self.out, "  - Command correction using Hamming distance")?;
        writeln!(self.out, "  - Command correction using Levenshtein distance")?;
        writeln!(self.out, "  - Command correction using anagram detection")?;
        writeln!(self.out, "  - Command correction using substring matches")?;
        writeln!(self.out, "  - Command history with up/down arrow keys")?;
        writeln!(self.out, "  - Tab completion for commands\n")?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn list(&mut self, index: &CommandIndex) -> Result<()> {
        writeln!(self.out, "Available commands ({} total):", index.len())?;
        write!(self.out, "{}", format_columns(index.as_slice(), LIST_COLUMNS))?;
        Ok(())
    }

    fn history(&mut self) -> Result<()> {
        write!(self.out, "{}", format_history(&self.history))?;
        Ok(())
    }

    /// Keeps at most the history limit, dropping the oldest lines first
    fn remember(&mut self, line: &str) {
        self.history.push(line.to_string());
        if self.history.len() > self.history_limit {
            let excess = self.history.len() - self.history_limit;
            self.history.drain(..excess);
        }
    }
}

/// Lay names out column-major, every cell padded to the longest name plus two
#[must_use]
pub fn format_columns(names: &[String], columns: usize) -> String {
    let columns = columns.max(1);
    let rows = names.len().div_ceil(columns);
    let width = names.iter().map(String::len).max().unwrap_or(0) + 2;

    let mut text = String::new();
    for row in 0..rows {
        for column in 0..columns {
            if let Some(name) = names.get(column * rows + row) {
                text.push_str(&format!("{name:<width$}"));
            }
        }
        text.push('\n');
    }
    text
}

/// One numbered line per entry, counting from 1
#[must_use]
pub fn format_history(entries: &[String]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>5}  {line}\n", i + 1))
        .collect()
}
