#![warn(clippy::all, clippy::pedantic)]

pub mod builtin;

pub use builtin::{Builtin, BuiltinHost};

use crate::{
    error::{Result, ShellError},
    index::CommandIndex,
};
use log::{debug, warn};
use std::process::Command;

/// Most tokens kept from one input line
pub const MAX_TOKENS: usize = 1023;

/// Split a line on runs of spaces and tabs.
///
/// There is no quoting; tokens beyond [`MAX_TOKENS`] are dropped.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    line.split([' ', '\t'])
        .filter(|field| !field.is_empty())
        .take(MAX_TOKENS)
        .map(ToString::to_string)
        .collect()
}

/// Result of routing one token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Resolution {
    /// A built-in ran or an external program was started and waited for
    Handled,
    /// The command name is not in the index
    NotFound,
    /// The `exit` built-in was requested
    Exit,
}

/// Starts an external program and blocks until it terminates.
pub trait Launcher {
    /// `argv[0]` is the program name and is also passed as the first argument.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Spawn`] if the process cannot be created
    fn launch(&self, argv: &[String]) -> Result<()>;
}

/// Launcher backed by `std::process::Command`, resolving the program through `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, argv: &[String]) -> Result<()> {
        let Some((program, args)) = argv.split_first() else {
            return Ok(());
        };

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| ShellError::Spawn {
                command: program.clone(),
                source,
            })?;

        // Only logged; the caller never sees how the child exited.
        debug!("`{program}` finished with {status}");
        Ok(())
    }
}

/// Routes a token sequence to a built-in or an external program.
pub struct Dispatcher<'a, L = SystemLauncher> {
    index: &'a CommandIndex,
    launcher: L,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub fn new(index: &'a CommandIndex) -> Self {
        Self::with_launcher(index, SystemLauncher)
    }
}

impl<'a, L: Launcher> Dispatcher<'a, L> {
    #[must_use]
    pub fn with_launcher(index: &'a CommandIndex, launcher: L) -> Self {
        Self { index, launcher }
    }

    #[must_use]
    pub fn index(&self) -> &'a CommandIndex {
        self.index
    }

    #[must_use]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Resolve and run `tokens`.
    ///
    /// Built-ins take precedence over indexed programs of the same name and
    /// skip the membership check. Any other name must be in the index.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in fails to write to the terminal or the
    /// external program cannot be started
    pub fn resolve<S: AsRef<str>>(
        &self,
        tokens: &[S],
        host: &mut dyn BuiltinHost,
    ) -> Result<Resolution> {
        let Some(name) = tokens.first().map(AsRef::as_ref) else {
            return Ok(Resolution::Handled);
        };

        if let Some(builtin) = Builtin::from_name(name) {
            debug!("Running built-in `{name}`");
            match builtin {
                Builtin::Exit => return Ok(Resolution::Exit),
                Builtin::Help => host.help()?,
                Builtin::Clear => host.clear()?,
                Builtin::List => host.list(self.index)?,
                Builtin::History => host.history()?,
            }
            return Ok(Resolution::Handled);
        }

        if !self.index.contains(name) {
            debug!("`{name}` is not in the command index");
            return Ok(Resolution::NotFound);
        }

        let argv: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        debug!("Launching {argv:?}");
        if let Err(err) = self.launcher.launch(&argv) {
            warn!("{err}");
            return Err(err);
        }
        Ok(Resolution::Handled)
    }
}
