//! Core error types for `promptprobe`.

use thiserror::Error;

/// Core error type for `promptprobe` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Endpoint template is missing a required placeholder.
    #[error("Invalid endpoint template {template:?}: missing {placeholder}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// The placeholder that was not found.
        placeholder: &'static str,
    },

    /// Model name is empty or whitespace.
    #[error("Model name must not be blank")]
    BlankModel,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
