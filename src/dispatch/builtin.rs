#![warn(clippy::all, clippy::pedantic)]

use crate::{error::Result, index::CommandIndex};

/// Commands handled inside the shell process.
///
/// `ALL` is the declaration order used when the built-ins are appended to
/// the command index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Exit,
    Help,
    Clear,
    List,
    History,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Exit,
        Builtin::Help,
        Builtin::Clear,
        Builtin::List,
        Builtin::History,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Help => "help",
            Builtin::Clear => "clear",
            Builtin::List => "list",
            Builtin::History => "history",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Builtin::Exit => "Exit the shell",
            Builtin::Help => "Display this help message",
            Builtin::Clear => "Clear the screen",
            Builtin::List => "List all available commands",
            Builtin::History => "Show command history",
        }
    }

    /// Exact, case-sensitive lookup
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

/// The side of the terminal that carries out built-in actions.
///
/// `exit` never reaches the host; the dispatcher turns it into
/// [`Resolution::Exit`](super::Resolution::Exit).
pub trait BuiltinHost {
    fn help(&mut self) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    fn list(&mut self, index: &CommandIndex) -> Result<()>;

    fn history(&mut self) -> Result<()>;

    /// Called for every line the user enters, so `history` has something to show
    fn remember(&mut self, _line: &str) {}
}
