//! Deadline supervision of a running child

use std::io;
use std::process::Child;
use std::time::Duration;

use log::debug;
use wait_timeout::ChildExt;

/// Sentinel exit code reported when the real status is unknown, e.g. after
/// a kill. `WaitOutcome::timed_out` is the authoritative timeout signal;
/// callers must not infer a timeout from this value alone.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Terminal state of a supervised child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    pub exit_code: i32,
    pub timed_out: bool,
}

/// Wait for `child`, killing it if it outlives `timeout`.
///
/// Returns only once the child has been reaped either way, so the caller
/// can still join the stream readers and collect partial output. A kill
/// that races a natural exit between the deadline and the signal is benign
/// and swallowed; the follow-up `wait` reaps the child regardless.
pub fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<WaitOutcome> {
    if let Some(status) = child.wait_timeout(timeout)? {
        return Ok(WaitOutcome {
            exit_code: status.code().unwrap_or(UNKNOWN_EXIT_CODE),
            timed_out: false,
        });
    }

    debug!("deadline elapsed, killing pid {}", child.id());
    let _ = child.kill();
    let status = child.wait()?;

    Ok(WaitOutcome {
        // A signal-killed child carries no exit code
        exit_code: status.code().unwrap_or(UNKNOWN_EXIT_CODE),
        timed_out: true,
    })
}
