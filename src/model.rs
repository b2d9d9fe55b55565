//! Domain Model
//!
//! Closed-set enums and validated request types for FastTransfer transfers.
//! Every enum is matched exhaustively at its consumption sites (capability
//! lookup, token synthesis, suggestion rules) so adding a variant is a
//! compile-time-visible change everywhere it is consumed.
//!
//! Raw boundary types (`Raw*`) carry untrusted, optional fields exactly as a
//! caller supplied them. Validated types (`SourceEndpoint`, `TargetEndpoint`,
//! `TransferRequest`) are produced only by [`crate::validate::validate`] and
//! are immutable afterwards.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Source database connection kinds accepted by FastTransfer.
///
/// The serialized form is the wire value passed to `--sourceconnectiontype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Clickhouse,
    Duckdb,
    Duckdbstream,
    Hana,
    Mssql,
    Mysql,
    Nzcopy,
    Odbc,
    Oledb,
    Oracle,
    Pgcopy,
    Pgsql,
    Teradata,
}

impl SourceKind {
    /// Wire value for the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clickhouse => "clickhouse",
            Self::Duckdb => "duckdb",
            Self::Duckdbstream => "duckdbstream",
            Self::Hana => "hana",
            Self::Mssql => "mssql",
            Self::Mysql => "mysql",
            Self::Nzcopy => "nzcopy",
            Self::Odbc => "odbc",
            Self::Oledb => "oledb",
            Self::Oracle => "oracle",
            Self::Pgcopy => "pgcopy",
            Self::Pgsql => "pgsql",
            Self::Teradata => "teradata",
        }
    }

    /// Parse a wire value. Unknown values are a validation concern, not a
    /// schema concern, so this returns `None` instead of erroring.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clickhouse" => Some(Self::Clickhouse),
            "duckdb" => Some(Self::Duckdb),
            "duckdbstream" => Some(Self::Duckdbstream),
            "hana" => Some(Self::Hana),
            "mssql" => Some(Self::Mssql),
            "mysql" => Some(Self::Mysql),
            "nzcopy" => Some(Self::Nzcopy),
            "odbc" => Some(Self::Odbc),
            "oledb" => Some(Self::Oledb),
            "oracle" => Some(Self::Oracle),
            "pgcopy" => Some(Self::Pgcopy),
            "pgsql" => Some(Self::Pgsql),
            "teradata" => Some(Self::Teradata),
            _ => None,
        }
    }

    /// All variants, in wire order
    pub const ALL: [Self; 13] = [
        Self::Clickhouse,
        Self::Duckdb,
        Self::Duckdbstream,
        Self::Hana,
        Self::Mssql,
        Self::Mysql,
        Self::Nzcopy,
        Self::Odbc,
        Self::Oledb,
        Self::Oracle,
        Self::Pgcopy,
        Self::Pgsql,
        Self::Teradata,
    ];

    /// Engine family behind this kind. Generic bridge kinds (`odbc`, `oledb`)
    /// have no family and act as wildcard sources in the compatibility matrix.
    #[must_use]
    pub const fn family(&self) -> Option<DatabaseFamily> {
        match self {
            Self::Clickhouse => Some(DatabaseFamily::Clickhouse),
            Self::Duckdb | Self::Duckdbstream => Some(DatabaseFamily::Duckdb),
            Self::Hana => Some(DatabaseFamily::Hana),
            Self::Mssql => Some(DatabaseFamily::SqlServer),
            Self::Mysql => Some(DatabaseFamily::Mysql),
            Self::Nzcopy => Some(DatabaseFamily::Netezza),
            Self::Odbc | Self::Oledb => None,
            Self::Oracle => Some(DatabaseFamily::Oracle),
            Self::Pgcopy | Self::Pgsql => Some(DatabaseFamily::Postgresql),
            Self::Teradata => Some(DatabaseFamily::Teradata),
        }
    }

    /// Whether this kind can read from a file stream (`--fileinput`)
    #[must_use]
    pub const fn supports_file_input(&self) -> bool {
        matches!(self, Self::Duckdbstream)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target database connection kinds accepted by FastTransfer.
///
/// The serialized form is the wire value passed to `--targetconnectiontype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Clickhousebulk,
    Duckdb,
    Hanabulk,
    Msbulk,
    Mysqlbulk,
    Nzbulk,
    Orabulk,
    Oradirect,
    Pgcopy,
    Teradata,
}

impl TargetKind {
    /// Wire value for the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clickhousebulk => "clickhousebulk",
            Self::Duckdb => "duckdb",
            Self::Hanabulk => "hanabulk",
            Self::Msbulk => "msbulk",
            Self::Mysqlbulk => "mysqlbulk",
            Self::Nzbulk => "nzbulk",
            Self::Orabulk => "orabulk",
            Self::Oradirect => "oradirect",
            Self::Pgcopy => "pgcopy",
            Self::Teradata => "teradata",
        }
    }

    /// Parse a wire value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clickhousebulk" => Some(Self::Clickhousebulk),
            "duckdb" => Some(Self::Duckdb),
            "hanabulk" => Some(Self::Hanabulk),
            "msbulk" => Some(Self::Msbulk),
            "mysqlbulk" => Some(Self::Mysqlbulk),
            "nzbulk" => Some(Self::Nzbulk),
            "orabulk" => Some(Self::Orabulk),
            "oradirect" => Some(Self::Oradirect),
            "pgcopy" => Some(Self::Pgcopy),
            "teradata" => Some(Self::Teradata),
            _ => None,
        }
    }

    /// All variants, in wire order
    pub const ALL: [Self; 10] = [
        Self::Clickhousebulk,
        Self::Duckdb,
        Self::Hanabulk,
        Self::Msbulk,
        Self::Mysqlbulk,
        Self::Nzbulk,
        Self::Orabulk,
        Self::Oradirect,
        Self::Pgcopy,
        Self::Teradata,
    ];

    /// Engine family behind this kind
    #[must_use]
    pub const fn family(&self) -> DatabaseFamily {
        match self {
            Self::Clickhousebulk => DatabaseFamily::Clickhouse,
            Self::Duckdb => DatabaseFamily::Duckdb,
            Self::Hanabulk => DatabaseFamily::Hana,
            Self::Msbulk => DatabaseFamily::SqlServer,
            Self::Mysqlbulk => DatabaseFamily::Mysql,
            Self::Nzbulk => DatabaseFamily::Netezza,
            Self::Orabulk | Self::Oradirect => DatabaseFamily::Oracle,
            Self::Pgcopy => DatabaseFamily::Postgresql,
            Self::Teradata => DatabaseFamily::Teradata,
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engine families used by the source-to-target compatibility matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DatabaseFamily {
    Clickhouse,
    Duckdb,
    Hana,
    Mysql,
    Netezza,
    Oracle,
    Postgresql,
    SqlServer,
    Teradata,
}

impl DatabaseFamily {
    /// Display name for listings
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clickhouse => "ClickHouse",
            Self::Duckdb => "DuckDB",
            Self::Hana => "SAP HANA",
            Self::Mysql => "MySQL",
            Self::Netezza => "Netezza",
            Self::Oracle => "Oracle",
            Self::Postgresql => "PostgreSQL",
            Self::SqlServer => "SQL Server",
            Self::Teradata => "Teradata",
        }
    }

    /// Families a source family can transfer to.
    ///
    /// Not every source supports every target; this table is the single place
    /// the pairing rules live.
    #[must_use]
    pub const fn compatible_targets(&self) -> &'static [Self] {
        match self {
            Self::Clickhouse => &[
                Self::Clickhouse,
                Self::Duckdb,
                Self::Postgresql,
                Self::SqlServer,
                Self::Mysql,
                Self::Oracle,
            ],
            Self::Duckdb => &[
                Self::Duckdb,
                Self::Postgresql,
                Self::SqlServer,
                Self::Mysql,
                Self::Oracle,
                Self::Clickhouse,
            ],
            Self::Mysql => &[
                Self::Mysql,
                Self::Postgresql,
                Self::SqlServer,
                Self::Oracle,
                Self::Duckdb,
                Self::Clickhouse,
            ],
            Self::Netezza => {
                &[Self::Netezza, Self::Postgresql, Self::SqlServer, Self::Oracle, Self::Duckdb]
            }
            Self::Oracle => &[
                Self::Oracle,
                Self::Postgresql,
                Self::SqlServer,
                Self::Mysql,
                Self::Duckdb,
                Self::Clickhouse,
            ],
            Self::Postgresql => &[
                Self::Postgresql,
                Self::SqlServer,
                Self::Mysql,
                Self::Oracle,
                Self::Duckdb,
                Self::Clickhouse,
                Self::Netezza,
            ],
            Self::Hana => {
                &[Self::Hana, Self::Postgresql, Self::SqlServer, Self::Oracle, Self::Duckdb]
            }
            Self::SqlServer => &[
                Self::SqlServer,
                Self::Postgresql,
                Self::Mysql,
                Self::Oracle,
                Self::Duckdb,
                Self::Clickhouse,
            ],
            Self::Teradata => {
                &[Self::Teradata, Self::Postgresql, Self::SqlServer, Self::Oracle, Self::Duckdb]
            }
        }
    }

    /// All families, in listing order
    pub const ALL: [Self; 9] = [
        Self::Clickhouse,
        Self::Duckdb,
        Self::Hana,
        Self::Mysql,
        Self::Netezza,
        Self::Oracle,
        Self::Postgresql,
        Self::SqlServer,
        Self::Teradata,
    ];
}

impl std::fmt::Display for DatabaseFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parallelism methods for splitting a transfer into concurrent partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ParallelMethod {
    /// PostgreSQL-native tuple identifier split
    Ctid,
    /// Distribute by distinct values of a key column (needs a supplied query)
    DataDriven,
    /// Even bucketing over numeric, date, or string columns
    Ntile,
    /// Netezza-native data-slice split
    #[serde(rename = "NZDataSlice")]
    NzDataSlice,
    /// Single-threaded transfer
    None,
    /// SQL Server physical-location split
    Physloc,
    /// Modulo distribution over a numeric key
    Random,
    /// Numeric range chunking
    RangeId,
    /// Oracle-native row identifier split
    Rowid,
}

impl ParallelMethod {
    /// Wire value for `--method`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ctid => "Ctid",
            Self::DataDriven => "DataDriven",
            Self::Ntile => "Ntile",
            Self::NzDataSlice => "NZDataSlice",
            Self::None => "None",
            Self::Physloc => "Physloc",
            Self::Random => "Random",
            Self::RangeId => "RangeId",
            Self::Rowid => "Rowid",
        }
    }

    /// Parse a wire value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Ctid" => Some(Self::Ctid),
            "DataDriven" => Some(Self::DataDriven),
            "Ntile" => Some(Self::Ntile),
            "NZDataSlice" => Some(Self::NzDataSlice),
            "None" => Some(Self::None),
            "Physloc" => Some(Self::Physloc),
            "Random" => Some(Self::Random),
            "RangeId" => Some(Self::RangeId),
            "Rowid" => Some(Self::Rowid),
            _ => None,
        }
    }

    /// All variants, in wire order
    pub const ALL: [Self; 9] = [
        Self::Ctid,
        Self::DataDriven,
        Self::Ntile,
        Self::NzDataSlice,
        Self::None,
        Self::Physloc,
        Self::Random,
        Self::RangeId,
        Self::Rowid,
    ];

    /// Whether this method partitions by an explicit key column
    #[must_use]
    pub const fn requires_key_column(&self) -> bool {
        matches!(self, Self::DataDriven | Self::Random | Self::RangeId | Self::Ntile)
    }

    /// The source kinds this method is restricted to, or `None` when the
    /// method works against any source.
    #[must_use]
    pub const fn restricted_to_sources(&self) -> Option<&'static [SourceKind]> {
        match self {
            Self::Ctid => Some(&[SourceKind::Pgsql, SourceKind::Pgcopy]),
            Self::Rowid => Some(&[SourceKind::Oracle]),
            Self::NzDataSlice => Some(&[SourceKind::Nzcopy]),
            Self::Physloc => Some(&[SourceKind::Mssql]),
            Self::DataDriven | Self::Ntile | Self::None | Self::Random | Self::RangeId => None,
        }
    }
}

impl std::fmt::Display for ParallelMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Load mode for the target table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LoadMode {
    /// Add to existing data
    #[default]
    Append,
    /// Clear the target table before loading
    Truncate,
}

impl LoadMode {
    /// Wire value for `--loadmode`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "Append",
            Self::Truncate => "Truncate",
        }
    }

    /// Parse a wire value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Append" => Some(Self::Append),
            "Truncate" => Some(Self::Truncate),
            _ => None,
        }
    }
}

/// Column mapping method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MapMethod {
    /// Map columns by position
    #[default]
    Position,
    /// Map columns by name (case-insensitive)
    Name,
}

impl MapMethod {
    /// Wire value for `--mapmethod`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::Name => "Name",
        }
    }

    /// Parse a wire value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Position" => Some(Self::Position),
            "Name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// Log level override passed through to `--loglevel` (lowercase wire values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Wire value for the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Information => "information",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Parse a wire value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "information" => Some(Self::Information),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

// ============================================================================
// Raw boundary types
// ============================================================================

/// Untrusted connection descriptor exactly as a caller supplied it.
///
/// Field presence and enum values are checked by [`crate::validate`], not by
/// serde, so that every problem is collected instead of failing on the first.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RawConnection {
    /// Connection kind wire value (e.g. "pgsql", "msbulk")
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Server address (host:port or host\instance)
    pub server: Option<String>,

    /// Database name
    pub database: Option<String>,

    /// Schema name
    pub schema: Option<String>,

    /// Table name (source: alternative to query/file_input)
    pub table: Option<String>,

    /// SQL query (source only, alternative to table)
    pub query: Option<String>,

    /// File path for data input (file-stream-capable sources only)
    pub file_input: Option<String>,

    /// Username
    pub user: Option<String>,

    /// Password. Never logged, never echoed in errors.
    pub password: Option<String>,

    /// Use trusted authentication
    #[serde(default)]
    pub trusted_auth: bool,

    /// Full connection string (alternative to server/user/password)
    pub connect_string: Option<String>,

    /// ODBC DSN name (source only)
    pub dsn: Option<String>,

    /// OleDB provider name (source only)
    pub provider: Option<String>,
}

/// Untrusted transfer options exactly as a caller supplied them
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    /// Parallelism method wire value (default "None")
    pub method: Option<String>,

    /// Column for data distribution (required for key-based methods)
    pub distribute_key_column: Option<String>,

    /// Parallelism degree: 0 = auto, >0 = fixed, <0 = CPU adaptive
    pub degree: Option<i32>,

    /// Load mode wire value (default "Append")
    pub load_mode: Option<String>,

    /// Batch size for bulk copy operations
    pub batch_size: Option<i64>,

    /// Column mapping method wire value (default "Position")
    pub map_method: Option<String>,

    /// Run ID for log correlation
    pub run_id: Option<String>,

    /// Distinct-value query for the DataDriven method
    pub data_driven_query: Option<String>,

    /// Use intermediate work tables
    #[serde(default)]
    pub use_work_tables: bool,

    /// Path to a custom settings JSON file
    pub settings_file: Option<String>,

    /// Log level override wire value
    pub log_level: Option<String>,

    /// Suppress the FastTransfer banner
    #[serde(default)]
    pub no_banner: bool,

    /// Path or URL to a license file
    pub license_path: Option<String>,
}

#[allow(clippy::derivable_impls)]
impl Default for RawOptions {
    fn default() -> Self {
        Self {
            method: None,
            distribute_key_column: None,
            degree: None,
            load_mode: None,
            batch_size: None,
            map_method: None,
            run_id: None,
            data_driven_query: None,
            use_work_tables: false,
            settings_file: None,
            log_level: None,
            no_banner: false,
            license_path: None,
        }
    }
}

/// Complete untrusted transfer request
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RawTransferRequest {
    /// Source database configuration
    pub source: RawConnection,

    /// Target database configuration
    pub target: RawConnection,

    /// Transfer execution options
    #[serde(default)]
    pub options: RawOptions,
}

// ============================================================================
// Validated types
// ============================================================================

/// Validated source endpoint. Constructed only by the validator.
#[derive(Debug, Clone, Serialize)]
pub struct SourceEndpoint {
    pub kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Never serialized; secrets only reach the unredacted token sequence
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub trusted_auth: bool,
    /// Never serialized; connection strings routinely embed credentials
    #[serde(skip_serializing)]
    pub connect_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Validated target endpoint. The narrower field set is deliberate: targets
/// take no query, DSN, provider, or file input.
#[derive(Debug, Clone, Serialize)]
pub struct TargetEndpoint {
    pub kind: TargetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub trusted_auth: bool,
    #[serde(skip_serializing)]
    pub connect_string: Option<String>,
}

/// Validated transfer options
#[derive(Debug, Clone, Serialize)]
pub struct TransferOptions {
    pub method: ParallelMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribute_key_column: Option<String>,
    pub degree: i32,
    pub load_mode: LoadMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    pub map_method: MapMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_driven_query: Option<String>,
    pub use_work_tables: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    pub no_banner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_path: Option<String>,
}

/// A fully validated transfer request. Immutable; either discarded after a
/// preview or handed to synthesis and, with explicit confirmation, execution.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub source: SourceEndpoint,
    pub target: TargetEndpoint,
    pub options: TransferOptions,
}

impl TransferRequest {
    /// Numbered human-readable explanation of what the transfer will do,
    /// shown in previews.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();

        if let Some(file) = &self.source.file_input {
            parts.push(format!(
                "Import file '{}' via {} into {}",
                file, self.source.kind, self.source.database
            ));
        } else if self.source.query.is_some() {
            let server_info = match &self.source.server {
                Some(server) => format!("{}/{}", server, self.source.database),
                None => self.source.database.clone(),
            };
            parts.push(format!("Execute query on {} ({})", self.source.kind, server_info));
        } else {
            let table = self.source.table.as_deref().unwrap_or("?");
            let qualified = match &self.source.schema {
                Some(schema) => format!("{schema}.{table}"),
                None => table.to_string(),
            };
            parts.push(format!(
                "Read from {} table: {}.{}",
                self.source.kind, self.source.database, qualified
            ));
        }

        let target_table = match &self.target.schema {
            Some(schema) => format!("{}.{}", schema, self.target.table),
            None => self.target.table.clone(),
        };
        parts.push(format!(
            "Write to {} table: {}.{}",
            self.target.kind, self.target.database, target_table
        ));

        match self.options.load_mode {
            LoadMode::Truncate => parts.push(
                "Mode: TRUNCATE target table before loading (all existing data will be deleted)"
                    .to_string(),
            ),
            LoadMode::Append => parts.push("Mode: APPEND to existing target table data".to_string()),
        }

        if self.options.method == ParallelMethod::None {
            parts.push("Parallelism: None (single-threaded transfer)".to_string());
        } else {
            let mut desc = format!("Parallelism: {} method", self.options.method);
            if let Some(key) = &self.options.distribute_key_column {
                desc.push_str(&format!(" on column '{key}'"));
            }
            desc.push_str(&format!(" with degree {}", self.options.degree));
            parts.push(desc);
        }

        parts.push(format!("Column mapping: {}", self.options.map_method.as_str()));

        parts
            .iter()
            .enumerate()
            .map(|(i, part)| format!("{}. {}", i + 1, part))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
