//! cmdbox: working-directory-confined command execution
//!
//! Runs shell commands, argv vectors, and scripts inside one configured
//! working directory, with a wall-clock timeout and bounded output capture.
//! Timed-out commands are killed and still report whatever output they
//! produced; captured streams are truncated to a byte budget while the true
//! sizes are reported alongside.
//!
//! # Modules
//!
//! - **config**: immutable startup configuration (root, timeout, byte budget)
//! - **execution**: process launch, deadline supervision, output capture
//! - **executor**: orchestration and the operation surface
//! - **fsops**: path resolution and supporting file operations
//!
//! # Example
//!
//! ```ignore
//! use cmdbox::ExecutorBuilder;
//! use std::time::Duration;
//!
//! let executor = ExecutorBuilder::new()
//!     .root("/tmp/workdir")
//!     .default_timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let result = executor.run_shell("echo hello")?;
//! println!("exit code: {}", result.exit_code);
//! ```

pub mod config;
pub mod errors;
pub mod execution;
pub mod executor;
pub mod fsops;

pub use config::ExecConfig;
pub use errors::{CmdboxError, Result};
pub use execution::{CapturedStream, CommandSpec, ExecutionResult, UNKNOWN_EXIT_CODE};
pub use executor::{ExecOptions, Executor, ExecutorBuilder};
pub use fsops::{DirEntryInfo, DirListing, ReadOutcome, WriteMode, WriteOutcome};
