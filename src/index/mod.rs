#![warn(clippy::all, clippy::pedantic)]

use crate::{dispatch::Builtin, error::ShellError};
use log::{debug, info};
use std::{
    env, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Immutable snapshot of every command name the shell recognises.
///
/// Layout is fixed at construction: executables found on the search path,
/// sorted by byte value, followed by the built-ins in declaration order.
/// Discovered names are not deduplicated, so a program present in two
/// search directories appears twice.
#[derive(Debug, Clone, Default)]
pub struct CommandIndex {
    entries: Vec<String>,
    capacity: usize,
    truncated: bool,
}

impl CommandIndex {
    /// Scan the directories listed in `PATH`
    #[must_use]
    pub fn from_env(capacity: usize) -> Self {
        let dirs: Vec<PathBuf> = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();
        Self::build(&dirs, capacity)
    }

    /// Scan `search_path` in order and build the index.
    ///
    /// Unreadable directories are skipped and discovery stops silently once
    /// `capacity` names have been collected.
    #[must_use]
    pub fn build<P: AsRef<Path>>(search_path: &[P], capacity: usize) -> Self {
        let mut discovered = Vec::new();

        'dirs: for dir in search_path {
            let dir = dir.as_ref();
            for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
                if discovered.len() >= capacity {
                    break 'dirs;
                }

                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        let source = err
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("directory walk failed"));
                        debug!(
                            "{}",
                            ShellError::DirectoryUnreadable {
                                path: dir.to_path_buf(),
                                source,
                            }
                        );
                        continue;
                    }
                };

                let file_type = entry.file_type();
                if !(file_type.is_file() || file_type.is_symlink()) || !is_executable(entry.path())
                {
                    continue;
                }

                if let Some(name) = entry.file_name().to_str() {
                    discovered.push(name.to_string());
                }
            }
        }

        let index = Self::from_names(discovered, capacity);
        info!(
            "Indexed {} commands from {} directories",
            index.len(),
            search_path.len()
        );
        index
    }

    /// Build an index from names that were already discovered.
    ///
    /// Names past `capacity` are dropped, the rest are sorted and the
    /// built-ins are appended while room remains.
    #[must_use]
    pub fn from_names<I, S>(discovered: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut discovered = discovered.into_iter();
        let mut entries: Vec<String> = discovered.by_ref().take(capacity).map(Into::into).collect();
        let mut truncated = discovered.next().is_some();

        entries.sort_unstable();

        for builtin in Builtin::ALL {
            if entries.len() >= capacity {
                truncated = true;
                break;
            }
            entries.push(builtin.name().to_string());
        }

        if truncated {
            debug!("{}", ShellError::IndexCapacityTruncated { capacity });
        }

        Self {
            entries,
            capacity,
            truncated,
        }
    }

    /// Exact, case-sensitive membership test
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    /// Lazily yield the entries starting with `prefix`, in index order
    #[must_use]
    pub fn prefix_matches<'a>(&'a self, prefix: &'a str) -> PrefixMatches<'a> {
        PrefixMatches {
            entries: &self.entries,
            prefix,
            position: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether discovery stopped early because the capacity was reached
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Iterator returned by [`CommandIndex::prefix_matches`].
///
/// Cloning it gives an independent cursor from the same position.
#[derive(Debug, Clone)]
pub struct PrefixMatches<'a> {
    entries: &'a [String],
    prefix: &'a str,
    position: usize,
}

impl PrefixMatches<'_> {
    /// Rewind to the first entry of the index
    pub fn restart(&mut self) {
        self.position = 0;
    }
}

impl<'a> Iterator for PrefixMatches<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.entries.get(self.position) {
            self.position += 1;
            if entry.starts_with(self.prefix) {
                return Some(entry.as_str());
            }
        }
        None
    }
}

/// Whether the current user may run the file at `path`.
///
/// Symlinks are followed, so a dangling link is never executable. On unix
/// this is an `access(X_OK)` check against the effective user, not a look at
/// the mode bits.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => which::which_in(name, Some(dir), dir).is_ok(),
        _ => false,
    }
}
