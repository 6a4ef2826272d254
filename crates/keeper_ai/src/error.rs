//! Error types for the navigation core
//!
//! Only contract violations end up here. A missing path or a degenerate one
//! is an ordinary outcome and is reported as "no behavior" instead.

use crate::agent::AgentId;
use thiserror::Error;

/// Navigation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    /// Caller passed inputs that break the call contract
    #[error("Invalid navigation request: {0}")]
    InvalidRequest(String),

    /// Configuration values out of range
    #[error("Invalid navigation configuration: {0}")]
    InvalidConfig(String),

    /// Agent is not registered with the navigation system
    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// Agent is already registered with the navigation system
    #[error("Agent already registered: {0}")]
    DuplicateAgent(AgentId),

    /// Simulation step must be finite and positive
    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f32),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
