//! Command Synthesis Integration Tests
//!
//! Full request-to-command scenarios:
//! - Canonical token ordering and determinism
//! - Redaction invariants over whole command lines
//! - The preview/run contract (unredacted tokens, redacted display)

use conveyor::capability;
use conveyor::command::{self, MASK};
use conveyor::model::{RawTransferRequest, TransferRequest};
use conveyor::validate;
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn build(body: serde_json::Value) -> TransferRequest {
    let raw: RawTransferRequest = serde_json::from_value(body).unwrap();
    let caps = capability::resolve(Some("FastTransfer Version 0.16.0.0"));
    validate::validate(&raw, &caps).expect("request validates")
}

fn full_request() -> TransferRequest {
    build(json!({
        "source": {
            "type": "pgsql",
            "server": "pg01:5432",
            "database": "analytics",
            "schema": "public",
            "table": "events",
            "user": "etl",
            "password": "pg-secret"
        },
        "target": {
            "type": "msbulk",
            "server": "mssql01",
            "database": "warehouse",
            "schema": "dbo",
            "table": "events",
            "user": "loader",
            "password": "ms-secret"
        },
        "options": {
            "method": "RangeId",
            "distribute_key_column": "event_id",
            "degree": 16,
            "load_mode": "Truncate",
            "batch_size": 250000,
            "map_method": "Name",
            "run_id": "batch-2024-11",
            "use_work_tables": true,
            "log_level": "warning",
            "no_banner": true
        }
    }))
}

fn value_after<'a>(tokens: &'a [String], flag: &str) -> &'a str {
    let i = tokens.iter().position(|t| t == flag).unwrap_or_else(|| panic!("{flag} missing"));
    &tokens[i + 1]
}

// ============================================================================
// Token Canon
// ============================================================================

#[test]
fn test_full_command_shape() {
    let tokens = command::synthesize(&full_request());

    assert_eq!(value_after(&tokens, "--sourceconnectiontype"), "pgsql");
    assert_eq!(value_after(&tokens, "--sourceschema"), "public");
    assert_eq!(value_after(&tokens, "--targetconnectiontype"), "msbulk");
    assert_eq!(value_after(&tokens, "--method"), "RangeId");
    assert_eq!(value_after(&tokens, "--distributeKeyColumn"), "event_id");
    assert_eq!(value_after(&tokens, "--degree"), "16");
    assert_eq!(value_after(&tokens, "--batchsize"), "250000");
    assert_eq!(value_after(&tokens, "--mapmethod"), "Name");
    assert_eq!(value_after(&tokens, "--runid"), "batch-2024-11");
    assert_eq!(value_after(&tokens, "--loglevel"), "warning");
    assert!(tokens.contains(&"--useworktables".to_string()));
    assert!(tokens.contains(&"--nobanner".to_string()));
}

#[test]
fn test_identical_requests_give_identical_tokens() {
    let a = command::synthesize(&full_request());
    let b = command::synthesize(&full_request());
    assert_eq!(a, b);
}

#[test]
fn test_every_source_token_precedes_every_target_token() {
    let tokens = command::synthesize(&full_request());
    let last_source = tokens.iter().rposition(|t| t.starts_with("--source")).unwrap();
    let first_target = tokens.iter().position(|t| t.starts_with("--target")).unwrap();
    assert!(last_source < first_target);
}

#[test]
fn test_defaults_are_explicit() {
    let request = build(json!({
        "source": {"type": "pgsql", "server": "h", "database": "d", "table": "t",
                   "user": "u", "password": "p"},
        "target": {"type": "pgcopy", "server": "h2", "database": "d2", "table": "t2",
                   "user": "u2", "password": "p2"},
        "options": {}
    }));
    let tokens = command::synthesize(&request);
    // defaulted fields still appear, keeping the command self-describing
    assert_eq!(value_after(&tokens, "--method"), "None");
    assert_eq!(value_after(&tokens, "--degree"), "-2");
    assert_eq!(value_after(&tokens, "--loadmode"), "Append");
    assert_eq!(value_after(&tokens, "--mapmethod"), "Position");
    // absent optionals yield no tokens at all
    assert!(!tokens.iter().any(|t| t == "--batchsize" || t == "--runid" || t == "--loglevel"));
}

// ============================================================================
// Redaction
// ============================================================================

#[test]
fn test_redaction_preserves_length_and_order() {
    let tokens = command::synthesize(&full_request());
    let redacted = command::redact(&tokens);

    assert_eq!(tokens.len(), redacted.len());
    let mut masked_positions = Vec::new();
    for (i, (original, shown)) in tokens.iter().zip(redacted.iter()).enumerate() {
        if original != shown {
            assert_eq!(shown, MASK);
            masked_positions.push(i);
        }
    }
    // exactly the two password values differ
    assert_eq!(masked_positions.len(), 2);
    for i in masked_positions {
        assert!(tokens[i - 1].ends_with("password"));
    }
}

#[test]
fn test_no_secret_survives_redaction_anywhere() {
    let request = build(json!({
        "source": {"type": "odbc", "connect_string": "DSN=prod;PWD=odbc-secret",
                   "database": "d", "table": "t"},
        "target": {"type": "msbulk", "server": "h", "database": "d2", "table": "t2",
                   "user": "u", "password": "ms-secret"},
        "options": {}
    }));
    let redacted = command::redact(&command::synthesize(&request));
    let joined = redacted.join(" ");
    assert!(!joined.contains("odbc-secret"));
    assert!(!joined.contains("ms-secret"));

    let display = command::render(&redacted);
    assert!(!display.contains("odbc-secret"));
    assert!(display.contains(MASK));
}

#[test]
fn test_redaction_is_idempotent() {
    let tokens = command::synthesize(&full_request());
    let once = command::redact(&tokens);
    let twice = command::redact(&once);
    assert_eq!(once, twice);
}

// ============================================================================
// Display Rendering
// ============================================================================

#[test]
fn test_render_is_line_per_flag() {
    let request = build(json!({
        "source": {"type": "pgsql", "server": "h", "database": "d",
                   "query": "SELECT id FROM events WHERE day = '2024-11-01'",
                   "user": "u", "password": "p"},
        "target": {"type": "pgcopy", "server": "h2", "database": "d2", "table": "t2",
                   "user": "u2", "password": "p2"},
        "options": {}
    }));
    let display = command::render(&command::redact(&command::synthesize(&request)));

    assert!(display.starts_with("FastTransfer \\\n"));
    assert!(display.contains("--query \"SELECT id FROM events WHERE day = '2024-11-01'\""));
    // one continuation per flag; negative numeric values are not flags
    let flag_count = command::synthesize(&request)
        .iter()
        .filter(|t| t.starts_with("--"))
        .count();
    assert_eq!(display.matches(" \\\n  ").count(), flag_count);
}
