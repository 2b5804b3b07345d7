//! Error types for the application layer
//!
//! Settings persistence and validation failures, plus engine errors surfaced
//! by the command-line front end.

use chess_engine::{ChessEngineError, SearchError};
use thiserror::Error;

/// Errors that can occur outside the engine core
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// A setting holds a value the engine cannot use
    #[error("Invalid setting {field}: {message}")]
    InvalidSetting { field: &'static str, message: String },

    #[error("Engine error: {0}")]
    Engine(#[from] ChessEngineError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

impl AppError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidSetting {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
