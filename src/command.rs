//! Command Synthesis and Redaction
//!
//! Turns a validated [`TransferRequest`] into the exact argument vector for
//! the FastTransfer binary, and produces the redacted form shown in previews,
//! logs, and error output.
//!
//! Synthesis is pure and canonical: identical requests yield byte-identical
//! token sequences, with source connection tokens first, then target
//! connection tokens, then transfer options, then logging/behavior flags.
//! Tokens are never shell-quoted here; they are passed to the process spawn
//! as discrete arguments.

use crate::model::TransferRequest;

/// Flags whose following value must never appear in any observable output
pub const SENSITIVE_FLAGS: &[&str] = &[
    "--sourcepassword",
    "--targetpassword",
    "-x",
    "-X",
    "--sourceconnectstring",
    "--targetconnectstring",
    "-g",
    "-G",
];

/// Replacement for redacted values
pub const MASK: &str = "******";

/// Build the canonical argument vector for a validated request.
///
/// The binary path is not included; the launcher prepends it. Boolean flags
/// are bare tokens, every other present field is one flag+value pair.
#[must_use]
pub fn synthesize(request: &TransferRequest) -> Vec<String> {
    let mut tokens = Vec::with_capacity(32);
    let push = |tokens: &mut Vec<String>, flag: &str, value: &str| {
        tokens.push(flag.to_string());
        tokens.push(value.to_string());
    };

    let source = &request.source;
    push(&mut tokens, "--sourceconnectiontype", source.kind.as_str());
    if let Some(connect_string) = &source.connect_string {
        push(&mut tokens, "--sourceconnectstring", connect_string);
    }
    if let Some(dsn) = &source.dsn {
        push(&mut tokens, "--sourcedsn", dsn);
    }
    if let Some(provider) = &source.provider {
        push(&mut tokens, "--sourceprovider", provider);
    }
    if let Some(server) = &source.server {
        push(&mut tokens, "--sourceserver", server);
    }
    if let Some(user) = &source.user {
        push(&mut tokens, "--sourceuser", user);
    }
    if let Some(password) = &source.password {
        push(&mut tokens, "--sourcepassword", password);
    }
    if source.trusted_auth {
        tokens.push("--sourcetrusted".to_string());
    }
    push(&mut tokens, "--sourcedatabase", &source.database);
    if let Some(schema) = &source.schema {
        push(&mut tokens, "--sourceschema", schema);
    }
    if let Some(table) = &source.table {
        push(&mut tokens, "--sourcetable", table);
    }
    if let Some(query) = &source.query {
        push(&mut tokens, "--query", query);
    }
    if let Some(file_input) = &source.file_input {
        push(&mut tokens, "--fileinput", file_input);
    }

    let target = &request.target;
    push(&mut tokens, "--targetconnectiontype", target.kind.as_str());
    if let Some(connect_string) = &target.connect_string {
        push(&mut tokens, "--targetconnectstring", connect_string);
    }
    if let Some(server) = &target.server {
        push(&mut tokens, "--targetserver", server);
    }
    if let Some(user) = &target.user {
        push(&mut tokens, "--targetuser", user);
    }
    if let Some(password) = &target.password {
        push(&mut tokens, "--targetpassword", password);
    }
    if target.trusted_auth {
        tokens.push("--targettrusted".to_string());
    }
    push(&mut tokens, "--targetdatabase", &target.database);
    if let Some(schema) = &target.schema {
        push(&mut tokens, "--targetschema", schema);
    }
    push(&mut tokens, "--targettable", &target.table);

    let options = &request.options;
    push(&mut tokens, "--method", options.method.as_str());
    if let Some(key) = &options.distribute_key_column {
        push(&mut tokens, "--distributeKeyColumn", key);
    }
    if let Some(query) = &options.data_driven_query {
        push(&mut tokens, "--datadrivenquery", query);
    }
    push(&mut tokens, "--degree", &options.degree.to_string());
    push(&mut tokens, "--loadmode", options.load_mode.as_str());
    if let Some(batch_size) = options.batch_size {
        push(&mut tokens, "--batchsize", &batch_size.to_string());
    }
    push(&mut tokens, "--mapmethod", options.map_method.as_str());
    if let Some(run_id) = &options.run_id {
        push(&mut tokens, "--runid", run_id);
    }
    if options.use_work_tables {
        tokens.push("--useworktables".to_string());
    }
    if let Some(settings_file) = &options.settings_file {
        push(&mut tokens, "--settingsfile", settings_file);
    }

    if let Some(level) = options.log_level {
        push(&mut tokens, "--loglevel", level.as_str());
    }
    if options.no_banner {
        tokens.push("--nobanner".to_string());
    }
    if let Some(license_path) = &options.license_path {
        push(&mut tokens, "--license", license_path);
    }

    tokens
}

/// Replace every value that follows a sensitive flag with [`MASK`].
///
/// Pure and total: output has the same length and order as the input, and
/// only positions immediately after a sensitive flag differ.
#[must_use]
pub fn redact(tokens: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut mask_next = false;
    for token in tokens {
        if mask_next {
            out.push(MASK.to_string());
            mask_next = false;
            continue;
        }
        mask_next = SENSITIVE_FLAGS.contains(&token.as_str());
        out.push(token.clone());
    }
    out
}

/// Render a token sequence as a multi-line display command.
///
/// Each flag starts a new continuation line; values containing whitespace are
/// double-quoted. Display only, never fed back to a shell.
#[must_use]
pub fn render(tokens: &[String]) -> String {
    // Negative numbers (e.g. an adaptive --degree) are values, not flags
    let is_flag = |token: &str| {
        token.starts_with('-')
            && !token.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    };

    let mut out = String::from("FastTransfer");
    for token in tokens {
        if is_flag(token) {
            out.push_str(" \\\n  ");
        } else {
            out.push(' ');
        }
        if token.chars().any(char::is_whitespace) {
            out.push('"');
            out.push_str(token);
            out.push('"');
        } else {
            out.push_str(token);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability;
    use crate::validate::validate;
    use serde_json::json;

    fn request(body: serde_json::Value) -> TransferRequest {
        let raw = serde_json::from_value(body).unwrap();
        let caps = capability::resolve(Some("FastTransfer Version 0.16.0.0"));
        validate(&raw, &caps).unwrap()
    }

    fn baseline() -> TransferRequest {
        request(json!({
            "source": {
                "type": "pgsql",
                "server": "localhost:5432",
                "database": "sourcedb",
                "schema": "public",
                "table": "users",
                "user": "sourceuser",
                "password": "s3cret"
            },
            "target": {
                "type": "msbulk",
                "server": "sqlhost",
                "database": "targetdb",
                "schema": "dbo",
                "table": "users",
                "user": "targetuser",
                "password": "t0psecret"
            },
            "options": {
                "method": "Ctid",
                "degree": 8,
                "load_mode": "Truncate"
            }
        }))
    }

    fn pair_value<'a>(tokens: &'a [String], flag: &str) -> Option<&'a str> {
        tokens
            .iter()
            .position(|t| t == flag)
            .and_then(|i| tokens.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_baseline_token_pairs() {
        let tokens = synthesize(&baseline());
        assert_eq!(pair_value(&tokens, "--sourceconnectiontype"), Some("pgsql"));
        assert_eq!(pair_value(&tokens, "--sourceserver"), Some("localhost:5432"));
        assert_eq!(pair_value(&tokens, "--sourcepassword"), Some("s3cret"));
        assert_eq!(pair_value(&tokens, "--targetconnectiontype"), Some("msbulk"));
        assert_eq!(pair_value(&tokens, "--targettable"), Some("users"));
        assert_eq!(pair_value(&tokens, "--method"), Some("Ctid"));
        assert_eq!(pair_value(&tokens, "--degree"), Some("8"));
        assert_eq!(pair_value(&tokens, "--loadmode"), Some("Truncate"));
        assert_eq!(pair_value(&tokens, "--mapmethod"), Some("Position"));
    }

    #[test]
    fn test_synthesis_is_byte_identical() {
        assert_eq!(synthesize(&baseline()), synthesize(&baseline()));
    }

    #[test]
    fn test_canonical_order_source_target_options() {
        let tokens = synthesize(&baseline());
        let pos = |flag: &str| tokens.iter().position(|t| t == flag).unwrap();
        assert!(pos("--sourceconnectiontype") < pos("--targetconnectiontype"));
        assert!(pos("--targetconnectiontype") < pos("--method"));
        assert!(pos("--method") < pos("--degree"));
    }

    #[test]
    fn test_trusted_auth_is_bare_and_passwordless() {
        let req = request(json!({
            "source": {
                "type": "mssql",
                "server": "srchost",
                "database": "db1",
                "table": "t1",
                "trusted_auth": true
            },
            "target": {
                "type": "msbulk",
                "server": "dsthost",
                "database": "db2",
                "table": "t2",
                "trusted_auth": true
            },
            "options": {}
        }));
        let tokens = synthesize(&req);
        assert!(tokens.contains(&"--sourcetrusted".to_string()));
        assert!(tokens.contains(&"--targettrusted".to_string()));
        assert!(!tokens.iter().any(|t| t == "--sourcepassword"));
        assert!(!tokens.iter().any(|t| t == "--targetpassword"));
        // bare flag: the next token is another flag, not a value
        let i = tokens.iter().position(|t| t == "--sourcetrusted").unwrap();
        assert!(tokens[i + 1].starts_with("--"));
    }

    #[test]
    fn test_query_source_emits_query_not_table() {
        let req = request(json!({
            "source": {
                "type": "pgsql",
                "server": "localhost",
                "database": "db",
                "query": "SELECT id, name FROM users WHERE active",
                "user": "u",
                "password": "p"
            },
            "target": {
                "type": "pgcopy",
                "server": "localhost",
                "database": "db2",
                "table": "t",
                "user": "u",
                "password": "p"
            },
            "options": {}
        }));
        let tokens = synthesize(&req);
        assert_eq!(pair_value(&tokens, "--query"), Some("SELECT id, name FROM users WHERE active"));
        assert!(!tokens.iter().any(|t| t == "--sourcetable"));
    }

    #[test]
    fn test_connect_string_form() {
        let req = request(json!({
            "source": {
                "type": "odbc",
                "connect_string": "Driver={X};Server=y;PWD=z",
                "database": "db",
                "table": "t"
            },
            "target": {
                "type": "pgcopy",
                "server": "localhost",
                "database": "db2",
                "table": "t",
                "user": "u",
                "password": "p"
            },
            "options": {}
        }));
        let tokens = synthesize(&req);
        assert_eq!(pair_value(&tokens, "--sourceconnectstring"), Some("Driver={X};Server=y;PWD=z"));
        assert!(!tokens.iter().any(|t| t == "--sourceserver"));
    }

    #[test]
    fn test_optional_options_emitted_when_present() {
        let req = request(json!({
            "source": {
                "type": "pgsql", "server": "h", "database": "d", "table": "t",
                "user": "u", "password": "p"
            },
            "target": {
                "type": "msbulk", "server": "h2", "database": "d2", "table": "t2",
                "user": "u2", "password": "p2"
            },
            "options": {
                "method": "RangeId",
                "distribute_key_column": "id",
                "batch_size": 50000,
                "run_id": "nightly-42",
                "use_work_tables": true,
                "log_level": "warning",
                "no_banner": true
            }
        }));
        let tokens = synthesize(&req);
        assert_eq!(pair_value(&tokens, "--distributeKeyColumn"), Some("id"));
        assert_eq!(pair_value(&tokens, "--batchsize"), Some("50000"));
        assert_eq!(pair_value(&tokens, "--runid"), Some("nightly-42"));
        assert_eq!(pair_value(&tokens, "--loglevel"), Some("warning"));
        assert!(tokens.contains(&"--useworktables".to_string()));
        assert!(tokens.contains(&"--nobanner".to_string()));
    }

    #[test]
    fn test_redact_masks_passwords_only() {
        let tokens = synthesize(&baseline());
        let redacted = redact(&tokens);
        assert_eq!(redacted.len(), tokens.len());
        for (original, masked) in tokens.iter().zip(redacted.iter()) {
            if original == "s3cret" || original == "t0psecret" {
                assert_eq!(masked, MASK);
            } else {
                assert_eq!(masked, original);
            }
        }
        assert!(!redacted.iter().any(|t| t == "s3cret" || t == "t0psecret"));
    }

    #[test]
    fn test_redact_masks_connect_strings() {
        let tokens = vec![
            "--sourceconnectstring".to_string(),
            "Driver=x;PWD=hunter2".to_string(),
            "--sourcedatabase".to_string(),
            "db".to_string(),
        ];
        let redacted = redact(&tokens);
        assert_eq!(redacted[1], MASK);
        assert_eq!(redacted[3], "db");
    }

    #[test]
    fn test_redact_short_flags() {
        for flag in ["-x", "-X", "-g", "-G"] {
            let tokens = vec![flag.to_string(), "secret".to_string()];
            assert_eq!(redact(&tokens)[1], MASK);
        }
    }

    #[test]
    fn test_redact_empty_and_trailing_flag() {
        assert!(redact(&[]).is_empty());
        // sensitive flag with no following value stays as-is
        let tokens = vec!["--sourcepassword".to_string()];
        assert_eq!(redact(&tokens), tokens);
    }

    #[test]
    fn test_render_quotes_whitespace_values() {
        let tokens = vec![
            "--query".to_string(),
            "SELECT 1 FROM t".to_string(),
            "--degree".to_string(),
            "8".to_string(),
        ];
        let rendered = render(&tokens);
        assert!(rendered.starts_with("FastTransfer"));
        assert!(rendered.contains("\"SELECT 1 FROM t\""));
        assert!(rendered.contains(" \\\n  --degree 8"));
    }
}
