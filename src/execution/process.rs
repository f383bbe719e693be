//! Process launch: shell-mode and argv-mode

use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::errors::{CmdboxError, Result};

/// What to execute: a shell command line or an explicit argument vector
#[derive(Debug, Clone)]
pub enum CommandSpec {
    /// Command line handed verbatim to `sh -c`
    Shell(String),
    /// Executable invoked directly with literal arguments, no shell
    /// interpretation
    Argv {
        argv: Vec<String>,
        /// Replacement environment; `None` inherits the parent's
        env: Option<Vec<(String, String)>>,
    },
}

impl CommandSpec {
    /// Argv-mode spec with the inherited environment
    pub fn argv(argv: Vec<String>) -> Self {
        Self::Argv { argv, env: None }
    }

    /// Identifier recorded in the execution result: the command line, or
    /// the argv joined with spaces
    pub fn identifier(&self) -> String {
        match self {
            Self::Shell(command) => command.clone(),
            Self::Argv { argv, .. } => argv.join(" "),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Shell(command) if command.trim().is_empty() => Err(
                CmdboxError::InvalidRequest("shell command is empty".to_string()),
            ),
            Self::Argv { argv, .. } if argv.is_empty() => Err(CmdboxError::InvalidRequest(
                "argv must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn program(&self) -> &str {
        match self {
            Self::Shell(_) => "sh",
            Self::Argv { argv, .. } => argv.first().map(String::as_str).unwrap_or(""),
        }
    }
}

/// Spawn exactly one child for `spec` with stdout/stderr piped and its
/// working directory set to `cwd`.
///
/// A failure to start (missing executable, permission denied) comes back
/// as [`CmdboxError::Launch`]; nothing here panics.
pub fn spawn(spec: &CommandSpec, cwd: &Path) -> Result<Child> {
    spec.validate()?;

    let mut command = match spec {
        CommandSpec::Shell(line) => {
            let mut command = Command::new("sh");
            command.arg("-c").arg(line);
            command
        }
        CommandSpec::Argv { argv, env } => {
            let mut command = Command::new(&argv[0]);
            command.args(&argv[1..]);
            if let Some(vars) = env {
                command.env_clear();
                command.envs(vars.iter().map(|(k, v)| (k, v)));
            }
            command
        }
    };

    command
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CmdboxError::Launch {
            program: spec.program().to_string(),
            reason: e.to_string(),
        })
}
