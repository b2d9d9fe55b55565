//! Command Synthesis Performance Benchmarks
//!
//! Measures the hot path an MCP tool call goes through: validate a raw
//! request, synthesize the token vector, and redact it for display.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use conveyor::capability;
use conveyor::command;
use conveyor::model::RawTransferRequest;
use conveyor::validate;

fn sample_request() -> RawTransferRequest {
    serde_json::from_value(serde_json::json!({
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
            "batch_size": 250000
        }
    }))
    .unwrap()
}

fn bench_validate(c: &mut Criterion) {
    let raw = sample_request();
    let caps = capability::resolve(Some("FastTransfer Version 0.16.0.0"));

    c.bench_function("validate_request", |b| {
        b.iter(|| {
            let result = validate::validate(black_box(&raw), black_box(&caps));
            assert!(result.is_ok());
            result
        });
    });
}

fn bench_synthesize_and_redact(c: &mut Criterion) {
    let raw = sample_request();
    let caps = capability::resolve(Some("FastTransfer Version 0.16.0.0"));
    let request = validate::validate(&raw, &caps).unwrap();

    c.bench_function("synthesize_tokens", |b| {
        b.iter(|| command::synthesize(black_box(&request)));
    });

    let tokens = command::synthesize(&request);
    c.bench_function("redact_tokens", |b| {
        b.iter(|| command::redact(black_box(&tokens)));
    });
}

fn bench_version_resolution(c: &mut Criterion) {
    c.bench_function("resolve_version", |b| {
        b.iter(|| capability::resolve(black_box(Some("FastTransfer Version 0.16.0.0"))));
    });
}

criterion_group!(benches, bench_validate, bench_synthesize_and_redact, bench_version_resolution);
criterion_main!(benches);
