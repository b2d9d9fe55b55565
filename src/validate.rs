//! Request Validation
//!
//! Turns an untrusted [`RawTransferRequest`] into a validated
//! [`TransferRequest`], or a collected list of every violated invariant.
//!
//! # Validation Strategy
//! - Exhaustive, not fail-fast: a caller gets all problems in one pass.
//! - Deterministic: the same raw request against the same capability snapshot
//!   always yields the same outcome.
//! - No side effects, no secret values in any message.
//!
//! Error codes are stable strings; field paths point at the offending raw
//! field (e.g. "source.connect_string", "options.distribute_key_column").

use crate::capability::ResolvedCapability;
use crate::error::ValidationError;
use crate::model::{
    LoadMode, LogLevel, MapMethod, ParallelMethod, RawConnection, RawTransferRequest, SourceEndpoint,
    SourceKind, TargetEndpoint, TargetKind, TransferOptions, TransferRequest,
};

/// Unknown value for a closed-set field
pub const UNKNOWN_VARIANT: &str = "UNKNOWN_VARIANT";
/// Two mutually exclusive fields are both present
pub const MUTUALLY_EXCLUSIVE: &str = "MUTUALLY_EXCLUSIVE";
/// A field required unconditionally is absent
pub const MISSING_REQUIRED: &str = "MISSING_REQUIRED";
/// A field required by another field's value is absent
pub const MISSING_CONDITIONAL: &str = "MISSING_CONDITIONAL";
/// A field is present but meaningless for the request's shape
pub const UNEXPECTED_FIELD: &str = "UNEXPECTED_FIELD";
/// The source family cannot transfer to the target family
pub const UNSUPPORTED_PAIR: &str = "UNSUPPORTED_PAIR";
/// The method is not usable with this source kind or tool version
pub const UNSUPPORTED_METHOD: &str = "UNSUPPORTED_METHOD";
/// The connection kind is not supported by the governing tool version
pub const UNSUPPORTED_KIND: &str = "UNSUPPORTED_KIND";
/// A numeric field is outside its legal range
pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";

/// Fixed parallelism degree must stay below this bound
const MAX_FIXED_DEGREE: i32 = 1024;

/// Validate a raw request against the governing capability snapshot.
///
/// Returns the validated, immutable request, or every violated invariant.
/// No partial request is ever returned on failure.
pub fn validate(
    raw: &RawTransferRequest,
    caps: &ResolvedCapability,
) -> Result<TransferRequest, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let source = validate_source(&raw.source, caps, &mut errors);
    let target = validate_target(&raw.target, caps, &mut errors);
    let options = validate_options(raw, caps, &mut errors);

    // Cross-entity rules need both sides parsed.
    if let (Some(source), Some(options)) = (source.as_ref(), options.as_ref()) {
        check_method_against_source(source.kind, options.method, &mut errors);
    }
    if let (Some(source), Some(target)) = (source.as_ref(), target.as_ref()) {
        check_pair_compatibility(source.kind, target.kind, &mut errors);
    }

    match (source, target, options) {
        (Some(source), Some(target), Some(options)) if errors.is_empty() => {
            Ok(TransferRequest { source, target, options })
        }
        _ => Err(errors),
    }
}

/// Which end of a transfer a lone descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    /// Parse from the wire value used by callers ("source" / "target")
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "source" => Some(Self::Source),
            "target" => Some(Self::Target),
            _ => None,
        }
    }
}

/// Validate a single connection descriptor outside the context of a full
/// request. Cross-entity rules (pair compatibility, method restrictions) do
/// not apply here.
pub fn validate_connection(
    raw: &RawConnection,
    side: Side,
    caps: &ResolvedCapability,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    match side {
        Side::Source => {
            validate_source(raw, caps, &mut errors);
        }
        Side::Target => {
            validate_target(raw, caps, &mut errors);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-fatal warnings for a request that validated successfully.
///
/// Feature-flag gaps and capability fallback are surfaced here rather than as
/// errors: the command may still work, but the caller should know the
/// capability snapshot is uncertain or the flag is version-gated.
#[must_use]
pub fn warnings(request: &TransferRequest, caps: &ResolvedCapability) -> Vec<String> {
    let mut out = Vec::new();
    let version = || {
        caps.version
            .map_or_else(|| "unknown".to_string(), |v| v.to_string())
    };

    if caps.used_fallback {
        out.push(
            "FastTransfer version could not be determined; assuming the conservative default \
             capability set"
                .to_string(),
        );
    }
    if caps.downgraded {
        out.push(format!(
            "detected FastTransfer version {} predates the oldest registered capability entry; \
             using the oldest entry",
            version()
        ));
    }

    let flags = caps.entry.flags;
    if request.source.file_input.is_some() && !flags.file_input {
        out.push(format!("--fileinput is not supported by FastTransfer {}", version()));
    }
    if request.options.settings_file.is_some() && !flags.settings_file {
        out.push(format!("--settingsfile is not supported by FastTransfer {}", version()));
    }
    if request.options.license_path.is_some() && !flags.license_path {
        out.push(format!("--license is not supported by FastTransfer {}", version()));
    }
    if request.options.no_banner && !flags.nobanner {
        out.push(format!("--nobanner is not supported by FastTransfer {}", version()));
    }

    out
}

fn validate_source(
    raw: &RawConnection,
    caps: &ResolvedCapability,
    errors: &mut Vec<ValidationError>,
) -> Option<SourceEndpoint> {
    let kind = match raw.kind.as_deref() {
        None => {
            errors.push(ValidationError::new(
                MISSING_REQUIRED,
                "source.type",
                "source connection type is required",
            ));
            None
        }
        Some(value) => match SourceKind::parse(value) {
            Some(kind) => Some(kind),
            None => {
                errors.push(ValidationError::new(
                    UNKNOWN_VARIANT,
                    "source.type",
                    format!("'{value}' is not a known source connection type"),
                ));
                None
            }
        },
    };

    if raw.database.is_none() {
        errors.push(ValidationError::new(
            MISSING_REQUIRED,
            "source.database",
            "source database name is required",
        ));
    }

    check_connection_strategy(raw, "source", errors);

    // DSN and provider are source-only concepts, checked here so the target
    // validator can reject them outright.
    if raw.dsn.is_some() && raw.provider.is_some() {
        errors.push(ValidationError::new(
            MUTUALLY_EXCLUSIVE,
            "source.dsn",
            "dsn and provider cannot both be set",
        ));
    }

    // Exactly one of table / query / file_input.
    let spec_count = [raw.table.is_some(), raw.query.is_some(), raw.file_input.is_some()]
        .iter()
        .filter(|present| **present)
        .count();
    match spec_count {
        0 => errors.push(ValidationError::new(
            MISSING_REQUIRED,
            "source.table",
            "source must specify one of table, query, or file_input",
        )),
        1 => {}
        _ => errors.push(ValidationError::new(
            MUTUALLY_EXCLUSIVE,
            "source.table",
            "table, query, and file_input are mutually exclusive",
        )),
    }

    if let (Some(kind), Some(_)) = (kind, raw.file_input.as_ref()) {
        if !kind.supports_file_input() {
            errors.push(ValidationError::new(
                UNEXPECTED_FIELD,
                "source.file_input",
                format!("file_input is not valid for source kind '{kind}'"),
            ));
        }
    }

    if let Some(kind) = kind {
        if !caps.entry.supports_source(kind) {
            errors.push(ValidationError::new(
                UNSUPPORTED_KIND,
                "source.type",
                format!("source kind '{kind}' is not supported by the resolved tool version"),
            ));
        }
    }

    let kind = kind?;
    let database = raw.database.clone()?;
    Some(SourceEndpoint {
        kind,
        server: raw.server.clone(),
        database,
        schema: raw.schema.clone(),
        table: raw.table.clone(),
        query: raw.query.clone(),
        file_input: raw.file_input.clone(),
        user: raw.user.clone(),
        password: raw.password.clone(),
        trusted_auth: raw.trusted_auth,
        connect_string: raw.connect_string.clone(),
        dsn: raw.dsn.clone(),
        provider: raw.provider.clone(),
    })
}

fn validate_target(
    raw: &RawConnection,
    caps: &ResolvedCapability,
    errors: &mut Vec<ValidationError>,
) -> Option<TargetEndpoint> {
    let kind = match raw.kind.as_deref() {
        None => {
            errors.push(ValidationError::new(
                MISSING_REQUIRED,
                "target.type",
                "target connection type is required",
            ));
            None
        }
        Some(value) => match TargetKind::parse(value) {
            Some(kind) => Some(kind),
            None => {
                errors.push(ValidationError::new(
                    UNKNOWN_VARIANT,
                    "target.type",
                    format!("'{value}' is not a known target connection type"),
                ));
                None
            }
        },
    };

    if raw.database.is_none() {
        errors.push(ValidationError::new(
            MISSING_REQUIRED,
            "target.database",
            "target database name is required",
        ));
    }
    if raw.table.is_none() {
        errors.push(ValidationError::new(
            MISSING_REQUIRED,
            "target.table",
            "target table name is required",
        ));
    }

    // Source-only fields on a target descriptor.
    for (present, field) in [
        (raw.query.is_some(), "target.query"),
        (raw.file_input.is_some(), "target.file_input"),
        (raw.dsn.is_some(), "target.dsn"),
        (raw.provider.is_some(), "target.provider"),
    ] {
        if present {
            errors.push(ValidationError::new(
                UNEXPECTED_FIELD,
                field,
                "this field is only valid on a source descriptor",
            ));
        }
    }

    check_connection_strategy(raw, "target", errors);

    if let Some(kind) = kind {
        if !caps.entry.supports_target(kind) {
            errors.push(ValidationError::new(
                UNSUPPORTED_KIND,
                "target.type",
                format!("target kind '{kind}' is not supported by the resolved tool version"),
            ));
        }
    }

    let kind = kind?;
    let database = raw.database.clone()?;
    let table = raw.table.clone()?;
    Some(TargetEndpoint {
        kind,
        server: raw.server.clone(),
        database,
        schema: raw.schema.clone(),
        table,
        user: raw.user.clone(),
        password: raw.password.clone(),
        trusted_auth: raw.trusted_auth,
        connect_string: raw.connect_string.clone(),
    })
}

/// Enforce the three mutually exclusive connection-description strategies:
/// full connection string, DSN, or host/credential form.
fn check_connection_strategy(raw: &RawConnection, side: &str, errors: &mut Vec<ValidationError>) {
    if raw.connect_string.is_some() {
        // One error per descriptor regardless of how many excluded fields
        // ride along, so a caller sees the strategy conflict once.
        if raw.server.is_some()
            || raw.user.is_some()
            || raw.password.is_some()
            || raw.dsn.is_some()
        {
            errors.push(ValidationError::new(
                MUTUALLY_EXCLUSIVE,
                format!("{side}.connect_string"),
                "connect_string excludes server, user, password, and dsn",
            ));
        }
        return;
    }

    if raw.dsn.is_some() {
        if raw.server.is_some() {
            errors.push(ValidationError::new(
                MUTUALLY_EXCLUSIVE,
                format!("{side}.dsn"),
                "dsn excludes server",
            ));
        }
        return;
    }

    // Host/credential form.
    if raw.trusted_auth && (raw.user.is_some() || raw.password.is_some()) {
        errors.push(ValidationError::new(
            MUTUALLY_EXCLUSIVE,
            format!("{side}.trusted_auth"),
            "trusted_auth excludes user and password",
        ));
    } else if !raw.trusted_auth && raw.user.is_none() {
        errors.push(ValidationError::new(
            MISSING_CONDITIONAL,
            format!("{side}.user"),
            "a user is required unless trusted_auth, connect_string, or dsn is used",
        ));
    }
}

fn validate_options(
    raw: &RawTransferRequest,
    caps: &ResolvedCapability,
    errors: &mut Vec<ValidationError>,
) -> Option<TransferOptions> {
    let opts = &raw.options;
    let before = errors.len();

    let method = match opts.method.as_deref() {
        None => Some(ParallelMethod::None),
        Some(value) => match ParallelMethod::parse(value) {
            Some(method) => Some(method),
            None => {
                errors.push(ValidationError::new(
                    UNKNOWN_VARIANT,
                    "options.method",
                    format!("'{value}' is not a known parallelism method"),
                ));
                None
            }
        },
    };

    let load_mode = match opts.load_mode.as_deref() {
        None => Some(LoadMode::Append),
        Some(value) => match LoadMode::parse(value) {
            Some(mode) => Some(mode),
            None => {
                errors.push(ValidationError::new(
                    UNKNOWN_VARIANT,
                    "options.load_mode",
                    format!("'{value}' is not a known load mode"),
                ));
                None
            }
        },
    };

    let map_method = match opts.map_method.as_deref() {
        None => Some(MapMethod::Position),
        Some(value) => match MapMethod::parse(value) {
            Some(method) => Some(method),
            None => {
                errors.push(ValidationError::new(
                    UNKNOWN_VARIANT,
                    "options.map_method",
                    format!("'{value}' is not a known map method"),
                ));
                None
            }
        },
    };

    let log_level = match opts.log_level.as_deref() {
        None => None,
        Some(value) => match LogLevel::parse(value) {
            Some(level) => Some(level),
            None => {
                errors.push(ValidationError::new(
                    UNKNOWN_VARIANT,
                    "options.log_level",
                    format!("'{value}' is not a known log level"),
                ));
                None
            }
        },
    };

    let degree = opts.degree.unwrap_or(-2);
    if degree >= MAX_FIXED_DEGREE {
        errors.push(ValidationError::new(
            OUT_OF_RANGE,
            "options.degree",
            format!("degree must be 0 (auto), 1..{MAX_FIXED_DEGREE} (fixed), or negative (CPU adaptive)"),
        ));
    }

    let batch_size = match opts.batch_size {
        None => None,
        Some(size) if size >= 1 && size <= i64::from(u32::MAX) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(size as u32)
        }
        Some(_) => {
            errors.push(ValidationError::new(
                OUT_OF_RANGE,
                "options.batch_size",
                "batch_size must be a positive integer",
            ));
            None
        }
    };

    if let Some(method) = method {
        if method.requires_key_column() && opts.distribute_key_column.is_none() {
            errors.push(ValidationError::new(
                MISSING_CONDITIONAL,
                "options.distribute_key_column",
                format!("method '{method}' requires distribute_key_column"),
            ));
        }
        if method == ParallelMethod::DataDriven {
            match opts.data_driven_query.as_deref() {
                Some(query) if !query.trim().is_empty() => {}
                _ => errors.push(ValidationError::new(
                    MISSING_CONDITIONAL,
                    "options.data_driven_query",
                    "method 'DataDriven' requires data_driven_query",
                )),
            }
        } else if opts.data_driven_query.is_some() {
            errors.push(ValidationError::new(
                UNEXPECTED_FIELD,
                "options.data_driven_query",
                "data_driven_query is only valid with method 'DataDriven'",
            ));
        }

        if !caps.entry.supports_method(method) {
            errors.push(ValidationError::new(
                UNSUPPORTED_METHOD,
                "options.method",
                format!("method '{method}' is not supported by the resolved tool version"),
            ));
        }
    }

    if errors.len() > before {
        return None;
    }

    Some(TransferOptions {
        method: method?,
        distribute_key_column: opts.distribute_key_column.clone(),
        degree,
        load_mode: load_mode?,
        batch_size,
        map_method: map_method?,
        run_id: opts.run_id.clone(),
        data_driven_query: opts.data_driven_query.clone(),
        use_work_tables: opts.use_work_tables,
        settings_file: opts.settings_file.clone(),
        log_level,
        no_banner: opts.no_banner,
        license_path: opts.license_path.clone(),
    })
}

/// Kind-specific methods only work against their own engine
fn check_method_against_source(
    kind: SourceKind,
    method: ParallelMethod,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(allowed) = method.restricted_to_sources() {
        if !allowed.contains(&kind) {
            errors.push(ValidationError::new(
                UNSUPPORTED_METHOD,
                "options.method",
                format!("method '{method}' does not work with source kind '{kind}'"),
            ));
        }
    }
}

/// The source family must be able to reach the target family. Generic bridge
/// sources (odbc, oledb) carry no family and pass unconditionally.
fn check_pair_compatibility(
    source: SourceKind,
    target: TargetKind,
    errors: &mut Vec<ValidationError>,
) {
    let Some(source_family) = source.family() else {
        return;
    };
    let target_family = target.family();
    if !source_family.compatible_targets().contains(&target_family) {
        errors.push(ValidationError::new(
            UNSUPPORTED_PAIR,
            "target.type",
            format!("{source_family} sources cannot transfer to {target_family} targets"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability;
    use serde_json::json;

    fn caps() -> ResolvedCapability {
        capability::resolve(Some("FastTransfer Version 0.16.0.0"))
    }

    fn baseline() -> RawTransferRequest {
        serde_json::from_value(json!({
            "source": {
                "type": "pgsql",
                "server": "localhost:5432",
                "database": "sourcedb",
                "schema": "public",
                "table": "users",
                "user": "sourceuser",
                "password": "sourcepass"
            },
            "target": {
                "type": "msbulk",
                "server": "localhost",
                "database": "targetdb",
                "schema": "dbo",
                "table": "users",
                "user": "targetuser",
                "password": "targetpass"
            },
            "options": {
                "method": "Ctid",
                "load_mode": "Truncate"
            }
        }))
        .unwrap()
    }

    fn codes_for(raw: &RawTransferRequest) -> Vec<(String, String)> {
        match validate(raw, &caps()) {
            Ok(_) => Vec::new(),
            Err(errors) => errors.into_iter().map(|e| (e.code, e.field)).collect(),
        }
    }

    #[test]
    fn test_baseline_validates() {
        let request = validate(&baseline(), &caps()).unwrap();
        assert_eq!(request.source.kind, SourceKind::Pgsql);
        assert_eq!(request.target.kind, TargetKind::Msbulk);
        assert_eq!(request.options.method, ParallelMethod::Ctid);
        assert_eq!(request.options.degree, -2); // default
    }

    #[test]
    fn test_unknown_source_kind_collected() {
        let mut raw = baseline();
        raw.source.kind = Some("msaccess".into());
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(UNKNOWN_VARIANT.to_string(), "source.type".to_string())]);
    }

    #[test]
    fn test_connect_string_conflict_is_exactly_one_error() {
        let mut raw = baseline();
        raw.source.connect_string = Some("Driver=x;Server=y;PWD=z".into());
        // server, user, and password all still set; still one error
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(MUTUALLY_EXCLUSIVE.to_string(), "source.connect_string".to_string())]);
    }

    #[test]
    fn test_connect_string_alone_is_valid() {
        let mut raw = baseline();
        raw.source.connect_string = Some("Driver=x;Server=y;PWD=z".into());
        raw.source.server = None;
        raw.source.user = None;
        raw.source.password = None;
        assert!(validate(&raw, &caps()).is_ok());
    }

    #[test]
    fn test_dsn_excludes_server() {
        let mut raw = baseline();
        raw.source.dsn = Some("MyDSN".into());
        raw.source.user = None;
        raw.source.password = None;
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(MUTUALLY_EXCLUSIVE.to_string(), "source.dsn".to_string())]);
    }

    #[test]
    fn test_trusted_auth_excludes_credentials() {
        let mut raw = baseline();
        raw.target.trusted_auth = true;
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(MUTUALLY_EXCLUSIVE.to_string(), "target.trusted_auth".to_string())]);
    }

    #[test]
    fn test_user_required_without_other_strategy() {
        let mut raw = baseline();
        raw.source.user = None;
        raw.source.password = None;
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(MISSING_CONDITIONAL.to_string(), "source.user".to_string())]);
    }

    #[test]
    fn test_table_and_query_conflict() {
        let mut raw = baseline();
        raw.source.query = Some("SELECT 1".into());
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(MUTUALLY_EXCLUSIVE.to_string(), "source.table".to_string())]);
    }

    #[test]
    fn test_source_needs_some_specification() {
        let mut raw = baseline();
        raw.source.table = None;
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(MISSING_REQUIRED.to_string(), "source.table".to_string())]);
    }

    #[test]
    fn test_file_input_only_for_stream_kinds() {
        let mut raw = baseline();
        raw.source.table = None;
        raw.source.file_input = Some("/data/export.csv".into());
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(UNEXPECTED_FIELD.to_string(), "source.file_input".to_string())]);

        raw.source.kind = Some("duckdbstream".into());
        raw.options.method = None; // Ctid no longer applies to a duckdb source
        let outcome = validate(&raw, &caps());
        assert!(outcome.is_ok(), "{outcome:?}");
    }

    #[test]
    fn test_target_rejects_source_only_fields() {
        let mut raw = baseline();
        raw.target.dsn = Some("X".into());
        raw.target.query = Some("SELECT 1".into());
        let mut codes = codes_for(&raw);
        codes.sort();
        // dsn also conflicts with the host/credential strategy fields
        assert!(codes.contains(&(UNEXPECTED_FIELD.to_string(), "target.dsn".to_string())));
        assert!(codes.contains(&(UNEXPECTED_FIELD.to_string(), "target.query".to_string())));
    }

    #[test]
    fn test_key_method_requires_key_column() {
        let mut raw = baseline();
        raw.options.method = Some("RangeId".into());
        let codes = codes_for(&raw);
        assert_eq!(
            codes,
            vec![(MISSING_CONDITIONAL.to_string(), "options.distribute_key_column".to_string())]
        );
    }

    #[test]
    fn test_data_driven_requires_query_then_clears() {
        let mut raw = baseline();
        raw.options.method = Some("DataDriven".into());
        raw.options.distribute_key_column = Some("region".into());
        let codes = codes_for(&raw);
        assert_eq!(
            codes,
            vec![(MISSING_CONDITIONAL.to_string(), "options.data_driven_query".to_string())]
        );

        raw.options.data_driven_query = Some("SELECT DISTINCT region FROM users".into());
        assert!(validate(&raw, &caps()).is_ok());
    }

    #[test]
    fn test_data_driven_query_forbidden_elsewhere() {
        let mut raw = baseline();
        raw.options.data_driven_query = Some("SELECT DISTINCT x FROM t".into());
        let codes = codes_for(&raw);
        assert_eq!(
            codes,
            vec![(UNEXPECTED_FIELD.to_string(), "options.data_driven_query".to_string())]
        );
    }

    #[test]
    fn test_ctid_rejected_for_mysql_source() {
        let mut raw = baseline();
        raw.source.kind = Some("mysql".into());
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(UNSUPPORTED_METHOD.to_string(), "options.method".to_string())]);
    }

    #[test]
    fn test_rowid_only_for_oracle() {
        let mut raw = baseline();
        raw.options.method = Some("Rowid".into());
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(UNSUPPORTED_METHOD.to_string(), "options.method".to_string())]);
    }

    #[test]
    fn test_incompatible_pair_rejected() {
        let mut raw = baseline();
        raw.source.kind = Some("nzcopy".into());
        raw.options.method = None;
        raw.target.kind = Some("mysqlbulk".into());
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(UNSUPPORTED_PAIR.to_string(), "target.type".to_string())]);
    }

    #[test]
    fn test_odbc_source_is_wildcard() {
        let mut raw = baseline();
        raw.source.kind = Some("odbc".into());
        raw.options.method = None;
        raw.target.kind = Some("teradata".into());
        assert!(validate(&raw, &caps()).is_ok());
    }

    #[test]
    fn test_degree_upper_bound() {
        let mut raw = baseline();
        raw.options.degree = Some(4096);
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(OUT_OF_RANGE.to_string(), "options.degree".to_string())]);
    }

    #[test]
    fn test_batch_size_must_be_positive() {
        let mut raw = baseline();
        raw.options.batch_size = Some(0);
        let codes = codes_for(&raw);
        assert_eq!(codes, vec![(OUT_OF_RANGE.to_string(), "options.batch_size".to_string())]);
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let mut raw = baseline();
        raw.source.kind = Some("bogus".into());
        raw.target.table = None;
        raw.options.method = Some("RangeId".into());
        let codes = codes_for(&raw);
        assert_eq!(codes.len(), 3);
    }

    #[test]
    fn test_no_secret_values_in_messages() {
        let mut raw = baseline();
        raw.source.password = Some("s3cr3t-value".into());
        raw.source.connect_string = Some("PWD=s3cr3t-value".into());
        let errors = validate(&raw, &caps()).unwrap_err();
        for error in errors {
            assert!(!error.message.contains("s3cr3t-value"));
        }
    }

    #[test]
    fn test_stream_source_rejected_by_old_version() {
        let old_caps = capability::resolve(Some("FastTransfer Version 0.13.0.0"));
        let mut raw = baseline();
        raw.source.kind = Some("duckdbstream".into());
        raw.options.method = None;
        let errors = validate(&raw, &old_caps).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, UNSUPPORTED_KIND);
        assert_eq!(errors[0].field, "source.type");
    }

    #[test]
    fn test_fallback_warning_surfaces() {
        let fallback_caps = capability::resolve(None);
        let mut raw = baseline();
        // the v13 default entry supports pgsql -> msbulk with Ctid
        let request = validate(&raw, &fallback_caps).unwrap();
        let warns = warnings(&request, &fallback_caps);
        assert!(warns.iter().any(|w| w.contains("could not be determined")));
        raw.options.no_banner = true;
        let request = validate(&raw, &fallback_caps).unwrap();
        let warns = warnings(&request, &fallback_caps);
        assert!(warns.iter().any(|w| w.contains("--nobanner")));
    }

    #[test]
    fn test_validate_connection_single_side() {
        let raw = baseline();
        assert!(validate_connection(&raw.source, Side::Source, &caps()).is_ok());

        let mut bad_target = raw.target.clone();
        bad_target.table = None;
        let errors = validate_connection(&bad_target, Side::Target, &caps()).unwrap_err();
        assert_eq!(errors[0].field, "target.table");
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("source"), Some(Side::Source));
        assert_eq!(Side::parse("target"), Some(Side::Target));
        assert_eq!(Side::parse("middle"), None);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut raw = baseline();
        raw.source.connect_string = Some("x".into());
        raw.options.method = Some("Nope".into());
        let first = codes_for(&raw);
        let second = codes_for(&raw);
        assert_eq!(first, second);
    }
}
