//! Shared Operation Implementations
//!
//! The CLI subcommands and MCP tools expose the same six operations; this
//! module holds the single implementation both call. Every function is
//! stateless: capability resolution happens per call and nothing is retained
//! between a preview and a later execution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::capability::{self, ResolvedCapability};
use crate::command;
use crate::config::Settings;
use crate::error::{ConveyorError, Result};
use crate::model::{DatabaseFamily, RawConnection, RawTransferRequest, SourceKind, TargetKind};
use crate::runner::{ExecutionReport, Launcher};
use crate::suggest::{self, Suggestion};
use crate::validate::{self, Side};

/// Resolve the governing capability entry, probing the binary when one is
/// configured. An unconfigured or unprobeable binary falls back to the
/// conservative default; that is a warning, not an error.
pub async fn resolve_capabilities(settings: &Settings) -> ResolvedCapability {
    let probe = match settings.binary_path.as_ref() {
        None => None,
        Some(path) => match Launcher::new(path, &settings.log_dir) {
            Ok(launcher) => launcher.probe_version().await,
            Err(e) => {
                debug!(error = %e.message(), "skipping version probe");
                None
            }
        },
    };
    capability::resolve(probe.as_deref())
}

/// Result of a preview: everything a caller needs to inspect and then run a
/// transfer. `tokens` is the unredacted argument vector for `run`; every
/// display field is redacted.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    /// Numbered explanation of what the transfer will do
    pub explanation: String,

    /// Full argument vector; pass verbatim to the run operation
    pub tokens: Vec<String>,

    /// The same vector with secret values masked
    pub redacted_tokens: Vec<String>,

    /// Redacted multi-line display form
    pub display: String,

    /// The capability snapshot the request was validated against
    pub capability: ResolvedCapability,
}

/// Validate a raw request and synthesize its command without running
/// anything. Returns the preview plus non-fatal warnings.
pub async fn preview(
    raw: &RawTransferRequest,
    settings: &Settings,
) -> Result<(Preview, Vec<String>)> {
    let caps = resolve_capabilities(settings).await;
    let request = validate::validate(raw, &caps).map_err(ConveyorError::Validation)?;
    let warnings = validate::warnings(&request, &caps);

    let tokens = command::synthesize(&request);
    let redacted_tokens = command::redact(&tokens);
    let display = command::render(&redacted_tokens);

    Ok((
        Preview {
            explanation: request.describe(),
            tokens,
            redacted_tokens,
            display,
            capability: caps,
        },
        warnings,
    ))
}

/// Run FastTransfer with a previously previewed argument vector.
///
/// Callers must obtain explicit confirmation before invoking this; nothing
/// here re-validates the tokens beyond what the binary itself enforces.
pub async fn run(tokens: &[String], settings: &Settings) -> Result<ExecutionReport> {
    let binary = settings.require_binary()?;
    let launcher = Launcher::new(binary, &settings.log_dir)?;
    launcher.execute(tokens, settings.timeout).await
}

/// Check a single connection descriptor without a full request
pub async fn check_connection(
    raw: &RawConnection,
    side: Side,
    settings: &Settings,
) -> Result<serde_json::Value> {
    let caps = resolve_capabilities(settings).await;
    validate::validate_connection(raw, side, &caps).map_err(ConveyorError::Validation)?;
    Ok(json!({
        "valid": true,
        "side": match side { Side::Source => "source", Side::Target => "target" },
    }))
}

/// The full source-to-target compatibility listing, by wire kind
pub fn supported_combinations(caps: &ResolvedCapability) -> serde_json::Value {
    let mut combinations = Vec::new();
    for source in SourceKind::ALL {
        if !caps.entry.supports_source(source) {
            continue;
        }
        let targets: Vec<&str> = TargetKind::ALL
            .into_iter()
            .filter(|target| caps.entry.supports_target(*target))
            .filter(|target| match source.family() {
                // Bridge kinds reach every supported target
                None => true,
                Some(family) => family.compatible_targets().contains(&target.family()),
            })
            .map(|target| target.as_str())
            .collect();
        combinations.push(json!({
            "source": source.as_str(),
            "family": source.family().map(|f| f.as_str()),
            "targets": targets,
        }));
    }
    json!({
        "combinations": combinations,
        "families": DatabaseFamily::ALL.map(|f| f.as_str()),
        "version": caps.version.map(|v| v.to_string()),
    })
}

/// Inputs for a parallelism suggestion
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SuggestRequest {
    /// Source connection kind (wire value, e.g. "pgsql")
    pub source_type: String,

    /// Whether the table has a numeric key column
    #[serde(default)]
    pub has_numeric_key: bool,

    /// Whether the table has a date or string key column
    #[serde(default)]
    pub has_date_or_string_key: bool,

    /// Approximate row count of the source table
    pub approx_row_count: u64,
}

/// Suggest a parallelism method for the described table
pub async fn suggest_method(params: &SuggestRequest, settings: &Settings) -> Result<Suggestion> {
    let kind = SourceKind::parse(&params.source_type).ok_or_else(|| {
        ConveyorError::schema(format!(
            "'{}' is not a known source connection type",
            params.source_type
        ))
    })?;
    let caps = resolve_capabilities(settings).await;
    Ok(suggest::suggest(
        kind,
        params.has_numeric_key,
        params.has_date_or_string_key,
        params.approx_row_count,
        caps.entry,
    ))
}

/// Installed-binary and capability information
pub async fn version_info(settings: &Settings) -> serde_json::Value {
    let caps = resolve_capabilities(settings).await;
    json!({
        "wrapper_version": env!("CARGO_PKG_VERSION"),
        "binary_path": settings.binary_path.as_ref().map(|p| p.display().to_string()),
        "detected_version": caps.version.map(|v| v.to_string()),
        "used_fallback": caps.used_fallback,
        "downgraded": caps.downgraded,
        "capability_entry": caps.entry,
    })
}
