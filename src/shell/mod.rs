#![warn(clippy::all, clippy::pedantic)]

pub mod editor;
#[cfg(unix)]
pub mod terminal;

pub use editor::{CommandCompleter, EditorInput};
#[cfg(unix)]
pub use terminal::TerminalMode;

use crate::{
    dispatch::{BuiltinHost, Dispatcher, Launcher, Resolution, tokenize},
    error::Result,
    prompt::{InteractiveResolver, LineSource, PromptOutcome},
    similarity::SimilarityEngine,
};
use colored::Colorize;
use log::{debug, info};
use std::{io::Write, path::Path};

/// Whether the main loop keeps going after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The read-eval loop: one line in, one resolution out, with the
/// suggestion dialogue in between when the command is unknown.
pub struct Session<'a, L> {
    dispatcher: Dispatcher<'a, L>,
    engine: SimilarityEngine,
}

impl<'a, L: Launcher> Session<'a, L> {
    #[must_use]
    pub fn new(dispatcher: Dispatcher<'a, L>, engine: SimilarityEngine) -> Self {
        Self { dispatcher, engine }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<'a, L> {
        &self.dispatcher
    }

    /// Read lines until `exit`, end of input, or a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions, such as losing the terminal
    pub fn run<I>(
        &self,
        input: &mut I,
        host: &mut dyn BuiltinHost,
        out: &mut dyn Write,
    ) -> Result<()>
    where
        I: LineSource + ?Sized,
    {
        loop {
            let Some(line) = input.read_line(&prompt())? else {
                writeln!(out)?;
                info!("End of input, leaving the shell");
                return Ok(());
            };

            if line.trim().is_empty() {
                continue;
            }
            input.remember(&line)?;
            host.remember(&line);

            if self.handle_line(&line, input, host, out)? == Flow::Exit {
                info!("Exit requested");
                return Ok(());
            }
        }
    }

    /// Resolve one line, running the suggestion dialogue if needed.
    ///
    /// Non-fatal errors are printed and swallowed.
    ///
    /// # Errors
    ///
    /// Returns an error for fatal conditions only
    pub fn handle_line<I>(
        &self,
        line: &str,
        input: &mut I,
        host: &mut dyn BuiltinHost,
        out: &mut dyn Write,
    ) -> Result<Flow>
    where
        I: LineSource + ?Sized,
    {
        let tokens = tokenize(line);
        let flow = match self.dispatcher.resolve(&tokens, host) {
            Ok(Resolution::Exit) => Ok(Flow::Exit),
            Ok(Resolution::Handled) => Ok(Flow::Continue),
            Ok(Resolution::NotFound) => self.suggest(&tokens, input, host, out),
            Err(err) => Err(err),
        };

        match flow {
            Err(err) if !err.is_fatal() => {
                writeln!(out, "{}", err.to_string().red())?;
                Ok(Flow::Continue)
            }
            other => other,
        }
    }

    fn suggest<I>(
        &self,
        tokens: &[String],
        input: &mut I,
        host: &mut dyn BuiltinHost,
        out: &mut dyn Write,
    ) -> Result<Flow>
    where
        I: LineSource + ?Sized,
    {
        let name = tokens.first().map(String::as_str).unwrap_or_default();
        writeln!(out, "{}", format!("Command not found: {name}").red())?;

        let found = self.engine.find(name, self.dispatcher.index());
        if found.is_empty() {
            writeln!(out, "No similar commands found. Please try again.")?;
            return Ok(Flow::Continue);
        }

        let candidates = found.deduplicated();
        debug!("{} suggestions for `{name}`", candidates.len());
        let plural = if candidates.len() == 1 { "" } else { "s" };
        writeln!(
            out,
            "{}",
            format!("Found {} possible command{plural}:", candidates.len()).yellow()
        )?;

        let outcome = InteractiveResolver::new(&candidates, tokens).run(
            input,
            out,
            &self.dispatcher,
            host,
        )?;

        Ok(match outcome {
            PromptOutcome::Accepted {
                resolution: Resolution::Exit,
                ..
            }
            | PromptOutcome::Eof => Flow::Exit,
            PromptOutcome::Accepted { .. } | PromptOutcome::Exhausted => Flow::Continue,
        })
    }
}

/// `dwimsh:<location>$ ` for the current directory
#[must_use]
pub fn prompt() -> String {
    let cwd = std::env::current_dir().ok();
    let home = dirs::home_dir();
    let location = prompt_location(cwd.as_deref(), home.as_deref());
    format!("{}{}{}$ ", "dwimsh".green(), ":".yellow(), location.blue())
}

/// `~` or `~/sub` inside the home directory, else the last path component
#[must_use]
pub fn prompt_location(cwd: Option<&Path>, home: Option<&Path>) -> String {
    let Some(cwd) = cwd else {
        return "unknown".to_string();
    };

    if let Some(relative) = home.and_then(|home| cwd.strip_prefix(home).ok()) {
        if relative.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", relative.display());
    }

    cwd.file_name().map_or_else(
        || cwd.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Keep the shell alive on SIGINT and leave cleanly on SIGTERM.
///
/// Ctrl-C aimed at a foreground child reaches the whole process group; the
/// child keeps the default action and dies, the shell carries on. SIGTERM
/// puts the terminal back the way it was at start-up and exits with status 0.
/// History is appended after every line, so nothing is left to flush.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be installed
#[cfg(unix)]
pub fn install_signal_handlers() -> anyhow::Result<()> {
    use anyhow::Context;
    use tokio::signal::unix::{SignalKind, signal};

    let saved_mode = TerminalMode::capture(libc::STDIN_FILENO);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build signal runtime")?;

    let (mut terminate, mut interrupt) = {
        let _guard = runtime.enter();
        (
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?,
            signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?,
        )
    };

    std::thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            runtime.block_on(async {
                loop {
                    tokio::select! {
                        _ = terminate.recv() => break,
                        Some(()) = interrupt.recv() => debug!("Interrupt ignored by the shell"),
                    }
                }
            });
            info!("Termination signal received, shutting down");
            if let Some(mode) = saved_mode {
                if !mode.restore() {
                    debug!("Could not restore terminal settings");
                }
            }
            std::process::exit(0);
        })
        .context("Failed to spawn signal thread")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dispatch::tests::{RecordingHost, RecordingLauncher},
        index::CommandIndex,
        prompt::tests::ScriptedInput,
    };
    use std::path::PathBuf;

    struct Harness {
        index: CommandIndex,
    }

    impl Harness {
        fn new(names: &[&str]) -> Self {
            Self {
                index: CommandIndex::from_names(names.iter().copied(), 64),
            }
        }

        fn session(&self) -> Session<'_, RecordingLauncher> {
            Session::new(
                Dispatcher::with_launcher(&self.index, RecordingLauncher::default()),
                SimilarityEngine::default(),
            )
        }
    }

    fn launched(session: &Session<'_, RecordingLauncher>) -> Vec<Vec<String>> {
        session.dispatcher().launcher().launched.borrow().clone()
    }

    #[test]
    fn test_known_command_runs_directly() -> Result<()> {
        let harness = Harness::new(&["git"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&[]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        let flow = session.handle_line("git status", &mut input, &mut host, &mut out)?;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(launched(&session), vec![vec!["git".to_string(), "status".to_string()]]);
        assert!(input.prompts.is_empty());
        Ok(())
    }

    #[test]
    fn test_typo_is_corrected_and_rerun_with_arguments() -> Result<()> {
        let harness = Harness::new(&["python", "perl"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&["y"]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        let flow = session.handle_line("pyhton script.py", &mut input, &mut host, &mut out)?;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            launched(&session),
            vec![vec!["python".to_string(), "script.py".to_string()]]
        );

        let out = String::from_utf8_lossy(&out);
        assert!(out.contains("Command not found: pyhton"));
        assert!(out.contains("Found 1 possible command:"));
        Ok(())
    }

    #[test]
    fn test_duplicates_are_offered_once() -> Result<()> {
        let harness = Harness::new(&["grep", "grep"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&["no"]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        session.handle_line("grpe", &mut input, &mut host, &mut out)?;
        assert_eq!(input.prompts.len(), 1);
        assert!(String::from_utf8_lossy(&out).contains("No more suggestions."));
        assert!(launched(&session).is_empty());
        Ok(())
    }

    #[test]
    fn test_no_suggestions() -> Result<()> {
        let harness = Harness::new(&["ls"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&[]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        let flow = session.handle_line("qqqqqqqq", &mut input, &mut host, &mut out)?;
        assert_eq!(flow, Flow::Continue);
        assert!(String::from_utf8_lossy(&out).contains("No similar commands found."));
        Ok(())
    }

    #[test]
    fn test_eof_during_dialogue_exits() -> Result<()> {
        let harness = Harness::new(&["python"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&[]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        let flow = session.handle_line("pyhton", &mut input, &mut host, &mut out)?;
        assert_eq!(flow, Flow::Exit);
        assert!(launched(&session).is_empty());
        Ok(())
    }

    #[test]
    fn test_accepting_exit_ends_the_loop() -> Result<()> {
        let harness = Harness::new(&["ls"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&["yes"]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        let flow = session.handle_line("exti", &mut input, &mut host, &mut out)?;
        assert_eq!(flow, Flow::Exit);
        Ok(())
    }

    #[test]
    fn test_spawn_failure_keeps_the_loop_alive() -> Result<()> {
        let index = CommandIndex::from_names(["ghost"], 64);
        let launcher = RecordingLauncher {
            fail: true,
            ..RecordingLauncher::default()
        };
        let session = Session::new(
            Dispatcher::with_launcher(&index, launcher),
            SimilarityEngine::default(),
        );
        let mut input = ScriptedInput::new(&[]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        let flow = session.handle_line("ghost", &mut input, &mut host, &mut out)?;
        assert_eq!(flow, Flow::Continue);
        assert!(String::from_utf8_lossy(&out).contains("failed to start `ghost`"));
        Ok(())
    }

    #[test]
    fn test_run_loop_until_exit() -> Result<()> {
        let harness = Harness::new(&["ls"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&["", "   ", "ls -l", "help", "exit", "ls"]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        session.run(&mut input, &mut host, &mut out)?;
        assert_eq!(launched(&session), vec![vec!["ls".to_string(), "-l".to_string()]]);
        assert_eq!(host.calls, ["help"]);
        assert_eq!(input.answers.len(), 1, "lines after `exit` are never read");
        Ok(())
    }

    #[test]
    fn test_run_loop_stops_at_end_of_input() -> Result<()> {
        let harness = Harness::new(&["ls"]);
        let session = harness.session();
        let mut input = ScriptedInput::new(&["ls"]);
        let mut host = RecordingHost::default();
        let mut out = Vec::new();

        session.run(&mut input, &mut host, &mut out)?;
        assert_eq!(launched(&session).len(), 1);
        Ok(())
    }

    #[test]
    fn test_prompt_location() {
        let home = PathBuf::from("/home/user");
        let home = Some(home.as_path());
        assert_eq!(prompt_location(home, home), "~");
        assert_eq!(
            prompt_location(Some(Path::new("/home/user/src/app")), home),
            "~/src/app"
        );
        assert_eq!(
            prompt_location(Some(Path::new("/var/log")), home),
            "log"
        );
        assert_eq!(prompt_location(Some(Path::new("/")), home), "/");
        assert_eq!(prompt_location(None, home), "unknown");
    }
}
