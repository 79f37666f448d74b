//! Error types for stage config loading.

use thiserror::Error;

/// Errors that can occur when loading or validating a stage config.
#[derive(Debug, Error)]
pub enum StageConfigError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// The config parsed but describes an unplayable stage.
    #[error("Invalid stage config: {0}")]
    Invalid(String),
}
