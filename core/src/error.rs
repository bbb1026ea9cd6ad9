use crate::{completion::CompletionError, config::ConfigError, roster::RosterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
    #[error("Failed to serialize context: {0}")]
    Context(#[from] csv::Error),
}
