//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout Conveyor.
//! All errors are structured and map to specific error codes for JSON output.
//!
//! # Error Categories
//! - `Schema`: malformed or missing raw request fields
//! - `Validation`: collected domain-rule violations (never fail-fast)
//! - `Launcher`: FastTransfer binary missing or not executable
//! - `Execution`: spawn failure or timeout while running the binary
//! - `Config`: settings or environment problems
//! - `Synthesis`: internal invariant violation; indicates a registry/validator
//!   inconsistency, never a user-facing condition

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One violated domain rule, collected during request validation.
///
/// Validation is exhaustive: every violated invariant is reported in one pass
/// so a caller can fix all problems at once. Messages never contain secret
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Stable machine-readable code (e.g. "MUTUALLY_EXCLUSIVE")
    pub code: String,

    /// Path of the offending field (e.g. "source.connect_string")
    pub field: String,

    /// Human-readable message, safe to display
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        code: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { code: code.into(), field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}

/// Main error type for Conveyor operations
#[derive(Error, Debug)]
pub enum ConveyorError {
    /// Malformed or missing required raw field; never partially applied
    #[error("Schema error: {0}")]
    Schema(String),

    /// The request is well-formed but violates one or more domain rules
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// FastTransfer binary missing, not a file, or not executable
    #[error("Launcher error: {0}")]
    Launcher(String),

    /// Spawn failure or timeout while running FastTransfer
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Settings or environment problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal invariant violation: a validated request could not be
    /// synthesized. Indicates a registry/validator inconsistency.
    #[error("Synthesis invariant violation: {0}")]
    Synthesis(String),
}

impl ConveyorError {
    /// Convert error to error code string for JSON output
    ///
    /// Error codes are stable and suitable for programmatic handling by agents.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Launcher(_) => "LAUNCHER_ERROR",
            Self::Execution(_) => "EXECUTION_FAILED",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Synthesis(_) => "SYNTHESIS_INVARIANT",
        }
    }

    /// Get human-readable error message (agent-appropriate, no sensitive data)
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The collected validation errors, if this is a validation failure
    #[must_use]
    pub fn validation_details(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a launcher error
    pub fn launcher(message: impl Into<String>) -> Self {
        Self::Launcher(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a synthesis invariant violation
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(message.into())
    }
}

/// Result type alias for Conveyor operations
pub type Result<T> = std::result::Result<T, ConveyorError>;
