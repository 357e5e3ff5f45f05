#![warn(clippy::all, clippy::pedantic)]

//! Do What I Mean Shell.
//!
//! An interactive shell that runs programs found on `PATH` and, when a
//! command name is not recognised, offers similar names one at a time until
//! the user accepts one.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod index;
pub mod prompt;
pub mod shell;
pub mod similarity;
pub mod suggestion;

pub use config::Config;
pub use dispatch::{Dispatcher, Resolution};
pub use error::ShellError;
pub use index::CommandIndex;
pub use prompt::InteractiveResolver;
pub use similarity::SimilarityEngine;
pub use suggestion::RecommendationList;

#[cfg(test)]
mod tests;
