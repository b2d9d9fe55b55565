//! Conveyor - Validation and Command Synthesis for FastTransfer
//!
//! Conveyor sits between agents (or scripts) and the FastTransfer bulk
//! data-movement binary. It turns an untrusted JSON transfer request into
//! either the exact, canonical command line FastTransfer will run, or an
//! exhaustive list of every violated rule.
//!
//! # Core Principles
//! - Exhaustive validation (every violated invariant reported in one pass)
//! - Deterministic behavior (identical inputs → identical outputs)
//! - Secrets never observable (redaction on every display and logging path)
//! - Two-step approval (preview never executes; execution needs confirmation)
//! - Version-aware (capabilities follow the installed binary version)
//!
//! # Architecture
//! This library provides the core functionality for both CLI and MCP
//! interfaces. Both interfaces are thin wrappers over [`ops`].
//!
//! # Module Organization
//! - [`error`] - Error types and stable error codes
//! - [`model`] - Domain enums, raw request types, validated request types
//! - [`capability`] - Version parsing and the capability registry
//! - [`validate`] - Exhaustive request validation
//! - [`suggest`] - Parallelism method suggestion
//! - [`command`] - Token synthesis, redaction, and display rendering
//! - [`config`] - Environment-driven settings
//! - [`runner`] - FastTransfer process launcher and version probe
//! - [`ops`] - Shared operation implementations
//! - [`output`] - JSON output envelope types
//! - [`mcp`] - MCP server (manual JSON-RPC 2.0 over stdio)

pub mod capability;
pub mod command;
pub mod config;
pub mod error;
pub mod mcp;
pub mod model;
pub mod ops;
pub mod output;
pub mod runner;
pub mod suggest;
pub mod validate;

// Re-export commonly used types for convenience
pub use capability::{CapabilityEntry, ResolvedCapability, ToolVersion};
pub use command::{redact, render, synthesize};
pub use error::{ConveyorError, Result, ValidationError};
pub use model::{
    LoadMode, MapMethod, ParallelMethod, RawConnection, RawTransferRequest, SourceKind,
    TargetKind, TransferRequest,
};
pub use output::{ErrorEnvelope, ErrorInfo, Metadata, SuccessEnvelope};
pub use runner::{ExecutionReport, Launcher};
pub use suggest::{suggest, Suggestion};
pub use validate::validate;
