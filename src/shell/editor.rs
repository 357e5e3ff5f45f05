#![warn(clippy::all, clippy::pedantic)]

use crate::{
    error::{Result, ShellError},
    index::CommandIndex,
    prompt::LineSource,
    suggestion::remove_duplicates,
};
use log::{debug, warn};
use rustyline::{
    CompletionType, Context, Editor, Helper,
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
};
use std::{
    io,
    path::{Path, PathBuf},
};

/// Completes the first word of a line against the command index
pub struct CommandCompleter<'a> {
    index: &'a CommandIndex,
}

impl<'a> CommandCompleter<'a> {
    #[must_use]
    pub fn new(index: &'a CommandIndex) -> Self {
        Self { index }
    }

    /// Start of the word under the cursor and every indexed name it prefixes.
    ///
    /// Only the command position completes; arguments get nothing.
    #[must_use]
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = line.get(..pos).unwrap_or(line);
        let start = head.rfind([' ', '\t']).map_or(0, |i| i + 1);
        if !head[..start].trim().is_empty() {
            return (start, Vec::new());
        }

        let word = &head[start..];
        let names = self
            .index
            .prefix_matches(word)
            .map(ToString::to_string)
            .collect();
        (start, remove_duplicates(names))
    }
}

impl Completer for CommandCompleter<'_> {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(line, pos);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandCompleter<'_> {
    type Hint = String;
}

impl Highlighter for CommandCompleter<'_> {}

impl Validator for CommandCompleter<'_> {}

impl Helper for CommandCompleter<'_> {}

/// Line editor with history and tab completion
pub struct EditorInput<'a> {
    editor: Editor<CommandCompleter<'a>, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl<'a> EditorInput<'a> {
    /// Set up the editor and load any saved history from `history_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::LineEditor`] if the terminal cannot be set up
    pub fn new(
        index: &'a CommandIndex,
        history_size: usize,
        history_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config = rustyline::Config::builder()
            .max_history_size(history_size)
            .map_err(editor_error)?
            .auto_add_history(false)
            .completion_type(CompletionType::List)
            .build();

        let mut editor = Editor::with_config(config).map_err(editor_error)?;
        editor.set_helper(Some(CommandCompleter::new(index)));

        if let Some(path) = &history_path {
            load_history(&mut editor, path);
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Lines recalled from earlier sessions, oldest first
    #[must_use]
    pub fn recalled(&self) -> Vec<String> {
        self.editor.history().iter().cloned().collect()
    }
}

fn load_history(editor: &mut Editor<CommandCompleter<'_>, DefaultHistory>, path: &Path) {
    match editor.load_history(path) {
        Ok(()) => debug!("Loaded history from {}", path.display()),
        Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!("No history file at {}", path.display());
        }
        Err(err) => warn!("Failed to load history from {}: {err}", path.display()),
    }
}

impl LineSource for EditorInput<'_> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                // Ctrl-C drops the current line and redraws the prompt
                Err(ReadlineError::Interrupted) => {}
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(editor_error(err)),
            }
        }
    }

    fn remember(&mut self, line: &str) -> Result<()> {
        self.editor.add_history_entry(line).map_err(editor_error)?;
        if let Some(path) = &self.history_path {
            if let Err(err) = self.editor.append_history(path) {
                warn!("Failed to save history to {}: {err}", path.display());
            }
        }
        Ok(())
    }
}

fn editor_error(err: ReadlineError) -> ShellError {
    ShellError::LineEditor(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer_for(names: &[&str]) -> CommandIndex {
        CommandIndex::from_names(names.iter().copied(), 64)
    }

    #[test]
    fn test_completes_first_word() {
        let index = completer_for(&["git", "gitk", "grep", "git"]);
        let completer = CommandCompleter::new(&index);

        let (start, names) = completer.candidates("gi", 2);
        assert_eq!(start, 0);
        assert_eq!(names, ["git", "gitk"]);
    }

    #[test]
    fn test_leading_blanks_still_complete() {
        let index = completer_for(&["ls"]);
        let completer = CommandCompleter::new(&index);

        let (start, names) = completer.candidates("  l", 3);
        assert_eq!(start, 2);
        assert_eq!(names, ["ls", "list"]);
    }

    #[test]
    fn test_arguments_do_not_complete() {
        let index = completer_for(&["git", "grep"]);
        let completer = CommandCompleter::new(&index);

        let (start, names) = completer.candidates("git gr", 6);
        assert_eq!(start, 4);
        assert!(names.is_empty());
    }

    #[test]
    fn test_empty_word_offers_everything() {
        let index = completer_for(&["ls"]);
        let completer = CommandCompleter::new(&index);

        let (_, names) = completer.candidates("", 0);
        assert_eq!(names.len(), index.len());
    }
}
