//! Parallelism Method Suggestion
//!
//! Deterministic advice for picking a `--method` value from coarse table
//! statistics. This is guidance only; it never mutates a request and never
//! contacts a database. The same inputs always produce the same suggestion.

use serde::Serialize;

use crate::capability::CapabilityEntry;
use crate::model::{ParallelMethod, SourceKind};

/// Below this row count, parallel splitting costs more than it saves
pub const SMALL_TABLE_ROWS: u64 = 100_000;

/// A suggested parallelism method with the reason it was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// The method to pass as `--method`
    pub method: ParallelMethod,
    /// Why this method fired, naming the triggering condition
    pub rationale: String,
}

/// Suggest a parallelism method for a table.
///
/// First-match rule order:
/// 1. Small table: parallelism overhead dominates, suggest `None`.
/// 2. Engine-native split (`Ctid`, `Rowid`, `NZDataSlice`) when the source
///    engine has one and the capability entry supports it.
/// 3. Numeric key: `RangeId`, degrading to `Random` when unsupported.
/// 4. Date or string key: `Ntile`.
/// 5. Otherwise `DataDriven`, which needs a caller-supplied distinct-value
///    query.
#[must_use]
pub fn suggest(
    source_kind: SourceKind,
    has_numeric_key: bool,
    has_date_or_string_key: bool,
    approx_row_count: u64,
    entry: &CapabilityEntry,
) -> Suggestion {
    if approx_row_count < SMALL_TABLE_ROWS {
        return Suggestion {
            method: ParallelMethod::None,
            rationale: format!(
                "table has roughly {approx_row_count} rows, below the {SMALL_TABLE_ROWS}-row \
                 threshold where parallel transfer pays off"
            ),
        };
    }

    if let Some((native, engine)) = native_method(source_kind) {
        if entry.supports_method(native) {
            return Suggestion {
                method: native,
                rationale: format!(
                    "{engine} sources support the engine-native {native} split, which needs no \
                     distribution key"
                ),
            };
        }
    }

    if has_numeric_key {
        if entry.supports_method(ParallelMethod::RangeId) {
            return Suggestion {
                method: ParallelMethod::RangeId,
                rationale: "a numeric key column allows contiguous id-range partitioning"
                    .to_string(),
            };
        }
        return Suggestion {
            method: ParallelMethod::Random,
            rationale: "a numeric key column allows modulo-based random partitioning \
                        (RangeId is unavailable in this version)"
                .to_string(),
        };
    }

    if has_date_or_string_key {
        return Suggestion {
            method: ParallelMethod::Ntile,
            rationale: "a date or string key column allows ntile bucketing over its sorted values"
                .to_string(),
        };
    }

    Suggestion {
        method: ParallelMethod::DataDriven,
        rationale: "no usable key column; DataDriven splits on a distinct-value query you must \
                    supply via data_driven_query"
            .to_string(),
    }
}

/// The engine-native split method for a source kind, with the engine name
/// used in the rationale.
const fn native_method(kind: SourceKind) -> Option<(ParallelMethod, &'static str)> {
    match kind {
        SourceKind::Pgsql | SourceKind::Pgcopy => Some((ParallelMethod::Ctid, "PostgreSQL")),
        SourceKind::Oracle => Some((ParallelMethod::Rowid, "Oracle")),
        SourceKind::Nzcopy => Some((ParallelMethod::NzDataSlice, "Netezza")),
        _ => None,
    }
}
