#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// Default file name for the config
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "DWIMSH_CONFIG";

/// Default file name for the line history, relative to the home directory
pub const HISTORY_FILE: &str = ".dwimsh_history";

/// Maximum number of entries in the command index
pub const MAX_COMMANDS: usize = 2048;

/// Maximum number of recommendations produced per failed lookup
pub const MAX_RECOMMENDATIONS: usize = 100;

/// Normalized edit distance at or below which a command is recommended
pub const LEVENSHTEIN_THRESHOLD: f64 = 0.4;

/// Fraction of the token length that equal-length commands may differ by
pub const HAMMING_RATIO: f64 = 0.5;

/// Commands shorter than this are never recommended
pub const MIN_CANDIDATE_LEN: usize = 2;

/// Number of lines kept by the line editor
pub const HISTORY_SIZE: usize = 1000;

/// Runtime settings for the shell.
///
/// Every field falls back to its default when missing from the config file,
/// so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_commands: usize,
    pub max_recommendations: usize,
    pub levenshtein_threshold: f64,
    pub hamming_ratio: f64,
    pub min_candidate_len: usize,
    pub history_file: Option<PathBuf>,
    pub history_size: usize,
    pub show_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_commands: MAX_COMMANDS,
            max_recommendations: MAX_RECOMMENDATIONS,
            levenshtein_threshold: LEVENSHTEIN_THRESHOLD,
            hamming_ratio: HAMMING_RATIO,
            min_candidate_len: MIN_CANDIDATE_LEN,
            history_file: None,
            history_size: HISTORY_SIZE,
            show_banner: true,
        }
    }
}

impl Config {
    /// Load the config from `$DWIMSH_CONFIG` or the per-user config directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be opened or parsed
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from_path(Path::new(&path));
        }

        match dirs::config_dir() {
            Some(dir) => Self::load_from_path(&dir.join("dwimsh").join(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Load the config from a specific path
    ///
    /// A missing file is not an error and yields the defaults.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The config file exists but cannot be opened
    /// - The config file exists but cannot be parsed as valid JSON
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file at {}", path.display()))?;

        let config: Config = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Where the line history lives: the configured file, or `~/.dwimsh_history`
    #[must_use]
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(HISTORY_FILE)))
    }
}
