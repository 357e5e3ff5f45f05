#![warn(clippy::all, clippy::pedantic)]

use crate::{
    dispatch::{BuiltinHost, Dispatcher, Launcher, Resolution, tokenize},
    error::Result,
    suggestion::RecommendationList,
};
use colored::Colorize;
use log::debug;
use std::io::Write;

/// Answers that accept the candidate on screen
pub const YES_RESPONSES: [&str; 7] = ["y", "yes", "yeah", "yep", "sure", "ok", "okay"];

/// Answers that move on to the next candidate
pub const NO_RESPONSES: [&str; 4] = ["n", "no", "nope", "nah"];

/// Where interactive answers come from
pub trait LineSource {
    /// Show `prompt` and read one line.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying terminal fails
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Keep `line` for recall; answers to suggestion prompts never get here.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be persisted
    fn remember(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Yes,
    No,
    Unrecognized,
}

/// Case-insensitive match against the yes and no vocabularies
#[must_use]
pub fn classify_response(line: &str) -> Response {
    let answer = line.trim().to_lowercase();
    if YES_RESPONSES.contains(&answer.as_str()) {
        Response::Yes
    } else if NO_RESPONSES.contains(&answer.as_str()) {
        Response::No
    } else {
        Response::Unrecognized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Presenting(usize),
    Accepted(usize),
    ExhaustedNo,
    Eof,
}

impl ResolverState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Presenting(_))
    }
}

/// How a dialogue ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// A candidate was accepted and the rebuilt line was dispatched
    Accepted {
        command_line: String,
        resolution: Resolution,
    },
    /// Every candidate was declined
    Exhausted,
    /// Input ended mid-dialogue; the shell should shut down
    Eof,
}

/// Walks the user through the candidates one at a time.
///
/// Starts on the first candidate. A yes accepts it, a no moves to the next
/// one, anything else asks again for the same candidate.
#[derive(Debug)]
pub struct InteractiveResolver<'a> {
    candidates: &'a RecommendationList,
    arguments: &'a [String],
    state: ResolverState,
}

impl<'a> InteractiveResolver<'a> {
    /// `failed_tokens` is the full token sequence that was not found; its
    /// arguments are carried over to whichever candidate is accepted.
    #[must_use]
    pub fn new(candidates: &'a RecommendationList, failed_tokens: &'a [String]) -> Self {
        let state = if candidates.is_empty() {
            ResolverState::ExhaustedNo
        } else {
            ResolverState::Presenting(0)
        };
        Self {
            candidates,
            arguments: failed_tokens.get(1..).unwrap_or_default(),
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// The candidate at `position` followed by the original arguments
    #[must_use]
    pub fn command_line(&self, position: usize) -> Option<String> {
        let candidate = self.candidates.get(position)?;
        let mut line = candidate.to_string();
        for argument in self.arguments {
            line.push(' ');
            line.push_str(argument);
        }
        Some(line)
    }

    /// Apply one answer; `None` means input has ended.
    ///
    /// Terminal states absorb every further answer.
    pub fn advance(&mut self, response: Option<&str>) -> ResolverState {
        let ResolverState::Presenting(position) = self.state else {
            return self.state;
        };

        self.state = match response.map(classify_response) {
            None => ResolverState::Eof,
            Some(Response::Yes) => ResolverState::Accepted(position),
            Some(Response::No) if position + 1 < self.candidates.len() => {
                ResolverState::Presenting(position + 1)
            }
            Some(Response::No) => ResolverState::ExhaustedNo,
            Some(Response::Unrecognized) => ResolverState::Presenting(position),
        };
        self.state
    }

    /// Run the dialogue to completion, dispatching the accepted line.
    ///
    /// The accepted candidate comes from the index, so dispatching it never
    /// reports `NotFound` and no second round of suggestions can start.
    ///
    /// # Errors
    ///
    /// Returns an error if reading an answer or writing a notice fails, or if
    /// the accepted command cannot be started
    pub fn run<L, W, Ln>(
        mut self,
        input: &mut L,
        out: &mut W,
        dispatcher: &Dispatcher<'_, Ln>,
        host: &mut dyn BuiltinHost,
    ) -> Result<PromptOutcome>
    where
        L: LineSource + ?Sized,
        W: Write + ?Sized,
        Ln: Launcher,
    {
        loop {
            match self.state {
                ResolverState::Presenting(position) => {
                    let line = self.command_line(position).unwrap_or_default();
                    let prompt = format!(
                        "{}{}{} ",
                        "Did you mean: \"".cyan(),
                        line.cyan().bold(),
                        "\"? [y/n]".cyan()
                    );
                    let answer = input.read_line(&prompt)?;
                    let next = self.advance(answer.as_deref());
                    if next == ResolverState::Presenting(position) {
                        writeln!(out, "{}", "Please enter 'y' or 'n'.".red())?;
                    }
                }
                ResolverState::Accepted(position) => {
                    let command_line = self.command_line(position).unwrap_or_default();
                    writeln!(out, "{}", format!("Executing: {command_line}").green())?;

                    let tokens = tokenize(&command_line);
                    let resolution = dispatcher.resolve(&tokens, host)?;
                    debug_assert_ne!(resolution, Resolution::NotFound);
                    return Ok(PromptOutcome::Accepted {
                        command_line,
                        resolution,
                    });
                }
                ResolverState::ExhaustedNo => {
                    writeln!(out, "No more suggestions.")?;
                    return Ok(PromptOutcome::Exhausted);
                }
                ResolverState::Eof => {
                    debug!("Input ended during the suggestion dialogue");
                    writeln!(out)?;
                    return Ok(PromptOutcome::Eof);
                }
            }
        }
    }
}
