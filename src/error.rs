//! Error types
//!
//! Only startup and persistence can fail. The simulation itself absorbs every
//! runtime condition with a deterministic fallback.

use thiserror::Error;

/// Result type for fallible game setup and storage operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced outside the simulation loop.
#[derive(Debug, Error)]
pub enum GameError {
    /// A required page element is missing.
    #[error("missing page element: #{0}")]
    MissingElement(String),

    /// The display surface could not be created or is unusable.
    #[error("display surface unavailable: {0}")]
    Display(String),

    /// The key-value store is unavailable or rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Tuning values that would break the simulation.
    #[error("invalid tuning: {0}")]
    Tuning(String),

    /// JSON (de)serialization failure.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
