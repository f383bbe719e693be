//! Main executor: launch, supervision, and capture tied together
//!
//! Each call owns its child process and pipes exclusively; concurrent calls
//! on one [`Executor`] share nothing but the read-only configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::config::ExecConfig;
use crate::errors::Result;
use crate::execution::capture::{spawn_reader, CapturedStream, RawCapture};
use crate::execution::outcome::{assemble, ExecutionResult};
use crate::execution::process::{spawn, CommandSpec};
use crate::execution::supervisor::wait_with_deadline;
use crate::fsops::{self, DirListing, ReadOutcome, WriteMode, WriteOutcome};

/// Subdirectory of the root holding inline script files
pub const INLINE_DIR: &str = "temp";
/// Required suffix for inline script files
pub const INLINE_SUFFIX: &str = ".py";

const DEFAULT_INLINE_NAME: &str = "inline_script.py";

/// Per-call overrides for [`Executor::run_argv`]
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Wall-clock timeout; the configured default when `None`
    pub timeout: Option<Duration>,
    /// Working directory; the configured root when `None`
    pub working_dir: Option<PathBuf>,
    /// Replacement environment; inherited when `None`
    pub env: Option<Vec<(String, String)>>,
}

/// Builder pattern for executor creation
pub struct ExecutorBuilder {
    config: ExecConfig,
}

impl ExecutorBuilder {
    pub fn new() -> Self {
        Self {
            config: ExecConfig::default(),
        }
    }

    /// Set the working directory root
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the default timeout
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    /// Set the per-stream capture budget in bytes
    pub fn max_output_bytes(mut self, limit: usize) -> Self {
        self.config.max_output_bytes = limit;
        self
    }

    pub fn build(self) -> Result<Executor> {
        Executor::new(self.config)
    }
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs commands and file operations confined to one working directory
pub struct Executor {
    config: ExecConfig,
}

impl Executor {
    /// Validate `config` and make sure the root directory exists
    pub fn new(config: ExecConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.root)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Run a shell command line in the root with the default timeout
    pub fn run_shell(&self, command: &str) -> Result<ExecutionResult> {
        self.execute(
            CommandSpec::Shell(command.to_string()),
            self.config.default_timeout,
            &self.config.root,
        )
    }

    /// Run an executable directly, without shell interpretation
    pub fn run_argv(&self, argv: &[String], options: ExecOptions) -> Result<ExecutionResult> {
        let timeout = options.timeout.unwrap_or(self.config.default_timeout);
        let cwd = options
            .working_dir
            .unwrap_or_else(|| self.config.root.clone());
        self.execute(
            CommandSpec::Argv {
                argv: argv.to_vec(),
                env: options.env,
            },
            timeout,
            &cwd,
        )
    }

    /// Run `interpreter` over a script resolved against the root
    pub fn run_script(
        &self,
        interpreter: &str,
        script: &str,
        args: &[String],
    ) -> Result<ExecutionResult> {
        let script_path = fsops::resolve_in_root(&self.config.root, script);
        let mut argv = vec![interpreter.to_string(), script_path.display().to_string()];
        argv.extend_from_slice(args);
        self.run_argv(&argv, ExecOptions::default())
    }

    /// Write `source` to a file under `<root>/temp/` and run it through
    /// `interpreter`.
    ///
    /// The destination filename is reduced to its base name and gets the
    /// required suffix appended if absent.
    pub fn run_inline_source(
        &self,
        source: &str,
        filename: &str,
        interpreter: &str,
    ) -> Result<ExecutionResult> {
        let dir = self.config.root.join(INLINE_DIR);
        fs::create_dir_all(&dir)?;

        let path = dir.join(sanitize_inline_name(filename));
        fs::write(&path, source)?;
        debug!("wrote inline source to {}", path.display());

        let argv = vec![interpreter.to_string(), path.display().to_string()];
        self.run_argv(&argv, ExecOptions::default())
    }

    /// List entries under the root or under `path`
    pub fn list_dir(&self, path: Option<&str>, recursive: bool) -> Result<DirListing> {
        fsops::list_dir(&self.config.root, path, recursive)
    }

    /// Read a text file from a root-scoped path
    pub fn read_text(&self, path: &str, max_chars: usize) -> ReadOutcome {
        fsops::read_text(&self.config.root, path, max_chars)
    }

    /// Write a text file under a root-scoped path
    pub fn write_text(&self, path: &str, content: &str, mode: WriteMode) -> WriteOutcome {
        fsops::write_text(&self.config.root, path, content, mode)
    }

    fn execute(
        &self,
        spec: CommandSpec,
        timeout: Duration,
        cwd: &Path,
    ) -> Result<ExecutionResult> {
        let identifier = spec.identifier();
        let limit = self.config.max_output_bytes;
        let start = Instant::now();

        let mut child = spawn(&spec, cwd)?;

        // Take both pipes before waiting; draining them on dedicated
        // threads keeps either stream from filling its OS buffer and
        // stalling the child.
        let stdout_reader = child.stdout.take().map(|pipe| spawn_reader(pipe, limit));
        let stderr_reader = child.stderr.take().map(|pipe| spawn_reader(pipe, limit));

        let wait = wait_with_deadline(&mut child, timeout)?;
        if wait.timed_out {
            warn!("command timed out after {timeout:?}: {identifier}");
        }

        // Final drain: the pipes reach EOF once the child is gone, so
        // partial output from a killed process is still collected here.
        let stdout = join_reader(stdout_reader, limit);
        let stderr = join_reader(stderr_reader, limit);

        Ok(assemble(
            identifier,
            cwd,
            wait,
            start.elapsed(),
            stdout,
            stderr,
        ))
    }
}

fn join_reader(handle: Option<JoinHandle<RawCapture>>, limit: usize) -> CapturedStream {
    match handle {
        Some(handle) => match handle.join() {
            Ok(raw) => CapturedStream::from_raw(raw, limit),
            Err(_) => CapturedStream::empty(limit),
        },
        None => CapturedStream::empty(limit),
    }
}

/// Strip directory components and force the required suffix
fn sanitize_inline_name(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    if base.is_empty() {
        return DEFAULT_INLINE_NAME.to_string();
    }
    if base.ends_with(INLINE_SUFFIX) {
        base.to_string()
    } else {
        format!("{base}{INLINE_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directory_components() {
        assert_eq!(sanitize_inline_name("../../etc/evil.py"), "evil.py");
        assert_eq!(sanitize_inline_name("/abs/path/script.py"), "script.py");
    }

    #[test]
    fn sanitize_appends_required_suffix() {
        assert_eq!(sanitize_inline_name("script"), "script.py");
        assert_eq!(sanitize_inline_name("script.txt"), "script.txt.py");
    }

    #[test]
    fn sanitize_defaults_empty_names() {
        assert_eq!(sanitize_inline_name(""), "inline_script.py");
        assert_eq!(sanitize_inline_name("/"), "inline_script.py");
    }
}
