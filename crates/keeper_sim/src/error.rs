//! Simulation errors

use keeper_ai::NavigationError;
use thiserror::Error;

/// Errors that stop a simulation run
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
}

pub type Result<T> = std::result::Result<T, SimError>;
