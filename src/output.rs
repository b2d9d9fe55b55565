//! JSON Output Envelope Types
//!
//! This module defines the structured JSON output format for all Conveyor
//! operations. Every operation returns either a `SuccessEnvelope` or an
//! `ErrorEnvelope`.
//!
//! # Output Contract
//! - Success: `{"ok": true, "op": "...", "data": {...}, "meta": {...}}`
//! - Error: `{"ok": false, "op": "...", "error": {"code": "...", "message": "...", "details": [...]}}`
//!
//! Output is stable and suitable for programmatic parsing by agents.
//! Envelope data never contains passwords or connection strings; command
//! token sequences shown in `data` are the redacted form unless the field
//! name says otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{ConveyorError, ValidationError};

/// Success envelope for operation results
///
/// Generic over the data type to support different operation return values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always true for success envelopes
    pub ok: bool,

    /// Operation that was performed (preview, run, suggest, ...)
    pub op: String,

    /// Operation-specific data
    pub data: T,

    /// Execution metadata
    pub meta: Metadata,
}

impl<T> SuccessEnvelope<T> {
    /// Create a new success envelope
    pub fn new(op: impl Into<String>, data: T, meta: Metadata) -> Self {
        Self { ok: true, op: op.into(), data, meta }
    }
}

/// Error envelope for operation failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always false for error envelopes
    pub ok: bool,

    /// Operation that was attempted
    pub op: String,

    /// Error information
    pub error: ErrorInfo,
}

impl ErrorEnvelope {
    /// Create a new error envelope
    pub fn new(op: impl Into<String>, error: ErrorInfo) -> Self {
        Self { ok: false, op: op.into(), error }
    }

    /// Create error envelope from a `ConveyorError`, carrying the collected
    /// validation details when present
    pub fn from_error(op: impl Into<String>, err: &ConveyorError) -> Self {
        Self::new(
            op,
            ErrorInfo {
                code: err.error_code().to_string(),
                message: err.message(),
                details: err.validation_details().map(<[ValidationError]>::to_vec),
            },
        )
    }
}

/// Error information structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code (e.g., "VALIDATION_FAILED", "LAUNCHER_ERROR")
    pub code: String,

    /// Human-readable error message (agent-appropriate, no sensitive data)
    pub message: String,

    /// Per-field validation errors, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationError>>,
}

impl ErrorInfo {
    /// Create a new error info without details
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into(), details: None }
    }
}

/// Execution metadata included in all success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Time spent handling the operation, in milliseconds
    pub execution_ms: u64,

    /// Non-fatal warnings (capability fallback, version-gated flags)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl Metadata {
    /// Create new metadata with just execution time
    pub fn new(execution_ms: u64) -> Self {
        Self { execution_ms, warnings: Vec::new() }
    }

    /// Create new metadata with execution time and warnings
    pub fn with_warnings(execution_ms: u64, warnings: Vec<String>) -> Self {
        Self { execution_ms, warnings }
    }
}
