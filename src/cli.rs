#![warn(clippy::all, clippy::pedantic)]

use crate::config::Config;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Do What I Mean Shell", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File used to persist line history
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    /// Maximum number of names held in the command index
    #[arg(long, value_name = "N")]
    pub max_commands: Option<usize>,

    /// Maximum number of suggestions offered for a mistyped command
    #[arg(long, value_name = "N")]
    pub max_recommendations: Option<usize>,

    /// Skip the start-up banner
    #[arg(long)]
    pub no_banner: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flags given on the command line override the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.history_file {
            config.history_file = Some(path.clone());
        }
        if let Some(max) = self.max_commands {
            config.max_commands = max;
        }
        if let Some(max) = self.max_recommendations {
            config.max_recommendations = max;
        }
        if self.no_banner {
            config.show_banner = false;
        }
    }

    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
