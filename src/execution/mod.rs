//! Execution layer: process launch, deadline supervision, and output capture
//!
//! One invocation maps to one child process with piped stdout/stderr.
//! Two dedicated reader threads drain the pipes while the parent waits on
//! the child under a deadline, so neither stream can fill its OS pipe
//! buffer and stall the other or the wait.
//!
//! # Components
//!
//! - **process**: shell-mode and argv-mode launch into piped stdio
//! - **supervisor**: deadline-raced wait with forced termination
//! - **capture**: bounded per-stream capture with true-size reporting
//! - **outcome**: assembly of the final [`ExecutionResult`]

pub mod capture;
pub mod outcome;
pub mod process;
pub mod supervisor;

pub use capture::CapturedStream;
pub use outcome::ExecutionResult;
pub use process::CommandSpec;
pub use supervisor::{WaitOutcome, UNKNOWN_EXIT_CODE};

#[cfg(test)]
mod tests;
