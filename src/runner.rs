//! FastTransfer Process Launcher
//!
//! Spawns the FastTransfer binary with a synthesized argument vector,
//! enforces the execution timeout, and captures the outcome. The unredacted
//! tokens go only to the spawned process; every log line and log file
//! records the redacted form.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command;
use crate::error::{ConveyorError, Result};

/// Cap on the version probe; a healthy binary answers in well under this
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one FastTransfer run
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// Process exit code; `None` when killed by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionReport {
    /// Whether the run ended with exit code zero
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Validated handle to the FastTransfer binary
#[derive(Debug, Clone)]
pub struct Launcher {
    binary: PathBuf,
    log_dir: PathBuf,
}

impl Launcher {
    /// Create a launcher, verifying the binary up front.
    ///
    /// The path must exist, be a regular file, and (on Unix) carry an execute
    /// bit. Catching this here gives a clear error instead of a spawn failure
    /// mid-operation.
    pub fn new(binary: impl Into<PathBuf>, log_dir: impl Into<PathBuf>) -> Result<Self> {
        let binary = binary.into();

        let metadata = std::fs::metadata(&binary).map_err(|_| {
            ConveyorError::launcher(format!(
                "FastTransfer binary not found at '{}'",
                binary.display()
            ))
        })?;
        if !metadata.is_file() {
            return Err(ConveyorError::launcher(format!(
                "'{}' is not a regular file",
                binary.display()
            )));
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o111 == 0 {
                return Err(ConveyorError::launcher(format!(
                    "'{}' is not executable",
                    binary.display()
                )));
            }
        }

        Ok(Self { binary, log_dir: log_dir.into() })
    }

    /// The validated binary path
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run FastTransfer with the given argument vector.
    ///
    /// A run that exceeds `timeout` is killed and reported as an execution
    /// error. Non-zero exit codes are not errors here; the report carries
    /// them for the caller to interpret.
    pub async fn execute(&self, tokens: &[String], timeout: Duration) -> Result<ExecutionReport> {
        let redacted = command::redact(tokens).join(" ");
        info!(binary = %self.binary.display(), command = %redacted, "starting transfer");

        let started = Instant::now();
        let child = Command::new(&self.binary)
            .args(tokens)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ConveyorError::execution(format!(
                    "failed to spawn '{}': {e}",
                    self.binary.display()
                ))
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "transfer timed out, killing process");
                self.append_log(&redacted, "TIMEOUT", started.elapsed()).await;
                return Err(ConveyorError::execution(format!(
                    "FastTransfer did not finish within {} seconds",
                    timeout.as_secs()
                )));
            }
            Ok(Err(e)) => {
                return Err(ConveyorError::execution(format!("failed to collect output: {e}")));
            }
            Ok(Ok(output)) => output,
        };

        let duration = started.elapsed();
        let report = ExecutionReport {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration_ms: duration.as_millis().try_into().unwrap_or(u64::MAX),
        };

        let status = report.exit_code.map_or_else(|| "SIGNAL".to_string(), |c| c.to_string());
        info!(exit_code = ?report.exit_code, duration_ms = report.duration_ms, "transfer finished");
        self.append_log(&redacted, &status, duration).await;

        Ok(report)
    }

    /// Run `--version --nobanner` and return the raw combined output.
    ///
    /// Returns `None` on any failure; the capability resolver treats an
    /// unprobeable binary as the conservative default.
    pub async fn probe_version(&self) -> Option<String> {
        let result = tokio::time::timeout(
            PROBE_TIMEOUT,
            Command::new(&self.binary)
                .args(["--version", "--nobanner"])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                debug!(probe = %text.trim(), "version probe output");
                Some(text)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "version probe failed to run");
                None
            }
            Err(_) => {
                warn!("version probe timed out");
                None
            }
        }
    }

    /// Append an execution record to a timestamped log file. The command
    /// line written here is always the redacted form. Logging failures are
    /// reported but never fail the run itself.
    async fn append_log(&self, redacted_command: &str, status: &str, duration: Duration) {
        let now = chrono::Utc::now();
        let path = self.log_dir.join(format!("conveyor_{}.log", now.format("%Y%m%d")));
        let line = format!(
            "{} status={} duration_ms={} command: {} {}\n",
            now.format("%Y-%m-%dT%H:%M:%SZ"),
            status,
            duration.as_millis(),
            self.binary.display(),
            redacted_command,
        );

        if let Err(e) = tokio::fs::create_dir_all(&self.log_dir).await {
            warn!(error = %e, dir = %self.log_dir.display(), "could not create log directory");
            return;
        }
        let result = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await;
        match result {
            Ok(mut file) => {
                if let Err(e) = file.write_all(line.as_bytes()).await {
                    warn!(error = %e, path = %path.display(), "could not write execution log");
                }
                if let Err(e) = file.flush().await {
                    warn!(error = %e, path = %path.display(), "could not flush execution log");
                }
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "could not open execution log");
            }
        }
    }
}
