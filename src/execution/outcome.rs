//! Structured outcome of one execution

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use super::capture::CapturedStream;
use super::supervisor::WaitOutcome;

/// Everything the caller learns about one finished command.
///
/// Created fresh per invocation and handed back by value; nothing here is
/// shared or persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Command line, or the argv joined with spaces
    pub identifier: String,
    pub working_dir: String,
    /// Real exit status, or −1 when it could not be determined
    pub exit_code: i32,
    /// Authoritative timeout signal; do not infer timeout from `exit_code`
    pub timed_out: bool,
    /// Wall-clock seconds from spawn to final status, including any
    /// kill-and-drain after a timeout
    pub duration_secs: f64,
    pub stdout: CapturedStream,
    pub stderr: CapturedStream,
}

impl ExecutionResult {
    /// True when the command exited 0 without hitting the deadline
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Pure aggregation of the pieces collected by the execution layer
pub fn assemble(
    identifier: String,
    working_dir: &Path,
    wait: WaitOutcome,
    elapsed: Duration,
    stdout: CapturedStream,
    stderr: CapturedStream,
) -> ExecutionResult {
    ExecutionResult {
        identifier,
        working_dir: working_dir.display().to_string(),
        exit_code: wait.exit_code,
        timed_out: wait.timed_out,
        duration_secs: elapsed.as_secs_f64(),
        stdout,
        stderr,
    }
}
