//! Application core: settings and errors
//!
//! ## Module Organization
//!
//! - `error` - application error type
//! - `settings` - engine settings and validation
//! - `settings_persistence` - JSON load/save in the platform config directory

pub mod error;
pub mod settings;
pub mod settings_persistence;

pub use error::{AppError, AppResult};
pub use settings::{EngineSettings, EvaluatorKind};
pub use settings_persistence::{load_settings, save_settings, settings_path, LoadOutcome};
