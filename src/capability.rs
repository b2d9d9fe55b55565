//! Capability Registry and Version Resolution
//!
//! FastTransfer's supported source/target kinds, parallelism methods, and
//! feature flags vary with the installed binary version. This module holds a
//! statically declared, ordered version-to-capability table and resolves a
//! probed or declared version to the governing entry.
//!
//! # Resolution Rules
//! - The greatest registered version not exceeding the resolved version wins.
//! - A version below the lowest registered entry resolves to the lowest entry
//!   and sets a downgrade flag.
//! - A missing or unparseable probe resolves to a conservative built-in
//!   default entry and sets `used_fallback`. Resolution never fails.
//!
//! The registry is immutable and process-wide; no locking is needed.

use serde::Serialize;

use crate::model::{ParallelMethod, SourceKind, TargetKind};

/// A FastTransfer version number (major.minor.patch.build).
///
/// Ordering is lexicographic over the four components. Missing trailing
/// components parse as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl ToolVersion {
    /// Create a version from its four components
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self { major, minor, patch, build }
    }

    /// Parse a version from free text.
    ///
    /// Accepts a full banner ("FastTransfer Version 0.16.0.0") or a bare
    /// dotted number anywhere in the text. At least major.minor must be
    /// present; missing trailing components are treated as zero.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        // Scan for the first run of dot-separated digit groups.
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i].is_ascii_digit() {
                let start = i;
                let mut end = i;
                while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
                    end += 1;
                }
                // Trim a trailing dot (e.g. end of sentence)
                while end > start && bytes[end - 1] == b'.' {
                    end -= 1;
                }
                let candidate = &text[start..end];
                if let Some(version) = Self::parse_dotted(candidate) {
                    return Some(version);
                }
                i = end + 1;
            } else {
                i += 1;
            }
        }
        None
    }

    fn parse_dotted(candidate: &str) -> Option<Self> {
        let mut components = [0u32; 4];
        let mut count = 0;
        for part in candidate.split('.') {
            if count == 4 {
                break;
            }
            components[count] = part.parse().ok()?;
            count += 1;
        }
        if count < 2 {
            return None;
        }
        Some(Self::new(components[0], components[1], components[2], components[3]))
    }
}

impl std::fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

/// Feature flags available in a specific FastTransfer version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub nobanner: bool,
    pub version_flag: bool,
    pub file_input: bool,
    pub settings_file: bool,
    pub license_path: bool,
}

/// One row of the version registry
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapabilityEntry {
    /// Version this entry starts applying to
    pub version: ToolVersion,
    /// Source kinds the binary accepts
    pub sources: &'static [SourceKind],
    /// Target kinds the binary accepts
    pub targets: &'static [TargetKind],
    /// Parallelism methods the binary accepts
    pub methods: &'static [ParallelMethod],
    /// Version-gated feature flags
    pub flags: FeatureFlags,
}

impl CapabilityEntry {
    /// Whether this entry supports the given source kind
    #[must_use]
    pub fn supports_source(&self, kind: SourceKind) -> bool {
        self.sources.contains(&kind)
    }

    /// Whether this entry supports the given target kind
    #[must_use]
    pub fn supports_target(&self, kind: TargetKind) -> bool {
        self.targets.contains(&kind)
    }

    /// Whether this entry supports the given parallelism method
    #[must_use]
    pub fn supports_method(&self, method: ParallelMethod) -> bool {
        self.methods.contains(&method)
    }
}

// Older builds predate the DuckDB stream reader, ClickHouse endpoints, and
// the settings/license plumbing.
const SOURCES_V13: &[SourceKind] = &[
    SourceKind::Duckdb,
    SourceKind::Hana,
    SourceKind::Mssql,
    SourceKind::Mysql,
    SourceKind::Nzcopy,
    SourceKind::Odbc,
    SourceKind::Oledb,
    SourceKind::Oracle,
    SourceKind::Pgcopy,
    SourceKind::Pgsql,
    SourceKind::Teradata,
];

const TARGETS_V13: &[TargetKind] = &[
    TargetKind::Duckdb,
    TargetKind::Hanabulk,
    TargetKind::Msbulk,
    TargetKind::Mysqlbulk,
    TargetKind::Nzbulk,
    TargetKind::Orabulk,
    TargetKind::Oradirect,
    TargetKind::Pgcopy,
    TargetKind::Teradata,
];

const METHODS_V13: &[ParallelMethod] = &[
    ParallelMethod::Ctid,
    ParallelMethod::DataDriven,
    ParallelMethod::Ntile,
    ParallelMethod::NzDataSlice,
    ParallelMethod::None,
    ParallelMethod::Physloc,
    ParallelMethod::Random,
    ParallelMethod::RangeId,
    ParallelMethod::Rowid,
];

const SOURCES_V16: &[SourceKind] = &[
    SourceKind::Clickhouse,
    SourceKind::Duckdb,
    SourceKind::Duckdbstream,
    SourceKind::Hana,
    SourceKind::Mssql,
    SourceKind::Mysql,
    SourceKind::Nzcopy,
    SourceKind::Odbc,
    SourceKind::Oledb,
    SourceKind::Oracle,
    SourceKind::Pgcopy,
    SourceKind::Pgsql,
    SourceKind::Teradata,
];

const TARGETS_V16: &[TargetKind] = &[
    TargetKind::Clickhousebulk,
    TargetKind::Duckdb,
    TargetKind::Hanabulk,
    TargetKind::Msbulk,
    TargetKind::Mysqlbulk,
    TargetKind::Nzbulk,
    TargetKind::Orabulk,
    TargetKind::Oradirect,
    TargetKind::Pgcopy,
    TargetKind::Teradata,
];

/// The version registry, ordered ascending by version. Extending support for
/// a new FastTransfer release means appending one row here.
pub static REGISTRY: &[CapabilityEntry] = &[
    CapabilityEntry {
        version: ToolVersion::new(0, 13, 0, 0),
        sources: SOURCES_V13,
        targets: TARGETS_V13,
        methods: METHODS_V13,
        flags: FeatureFlags {
            nobanner: false,
            version_flag: false,
            file_input: false,
            settings_file: false,
            license_path: false,
        },
    },
    CapabilityEntry {
        version: ToolVersion::new(0, 16, 0, 0),
        sources: SOURCES_V16,
        targets: TARGETS_V16,
        methods: METHODS_V13,
        flags: FeatureFlags {
            nobanner: true,
            version_flag: true,
            file_input: true,
            settings_file: true,
            license_path: true,
        },
    },
];

/// Conservative default used when no version can be determined. The lowest
/// registered entry is the safest assumption about an unknown binary.
#[must_use]
pub fn default_entry() -> &'static CapabilityEntry {
    &REGISTRY[0]
}

/// The capability entry governing a request, with provenance flags
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResolvedCapability {
    /// The governing registry entry
    pub entry: &'static CapabilityEntry,
    /// The version that was resolved, if any
    pub version: Option<ToolVersion>,
    /// True when no version could be determined and the default was used
    pub used_fallback: bool,
    /// True when the resolved version was below the lowest registered entry
    pub downgraded: bool,
}

/// Pick the greatest registered entry whose version does not exceed `version`
#[must_use]
pub fn entry_for(version: ToolVersion) -> ResolvedCapability {
    let mut best = None;
    for entry in REGISTRY {
        if entry.version <= version {
            best = Some(entry);
        } else {
            break;
        }
    }
    match best {
        Some(entry) => ResolvedCapability {
            entry,
            version: Some(version),
            used_fallback: false,
            downgraded: false,
        },
        None => ResolvedCapability {
            entry: &REGISTRY[0],
            version: Some(version),
            used_fallback: false,
            downgraded: true,
        },
    }
}

/// Resolve the governing capability entry from a probe's raw output.
///
/// Parsing failure or an absent probe never raises; the conservative default
/// entry is substituted and `used_fallback` is set so callers can tell the
/// result apart from a confirmed version.
#[must_use]
pub fn resolve(probe_output: Option<&str>) -> ResolvedCapability {
    match probe_output.and_then(ToolVersion::parse) {
        Some(version) => entry_for(version),
        None => ResolvedCapability {
            entry: default_entry(),
            version: None,
            used_fallback: true,
            downgraded: false,
        },
    }
}
