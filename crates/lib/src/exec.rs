//! External process invocation.
//!
//! Every delegation the pipeline performs goes through [`run`]: the command is
//! echoed before it is spawned so a failure can be diagnosed by re-running the
//! echoed line by hand, the working directory is an explicit argument at the
//! call site (never ambient process state), and the child's exit code is
//! preserved in the error so the whole process can propagate it unchanged.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors that can occur while invoking an external program.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be spawned (not on PATH, not executable, bad cwd).
  #[error("failed to launch '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran and exited non-zero (or was killed by a signal).
  #[error("command failed with exit code {code:?}: {cmd}")]
  Failed { cmd: String, code: Option<i32> },
}

impl ExecError {
  /// The child's exit code, when it ran and reported one.
  pub fn exit_code(&self) -> Option<i32> {
    match self {
      ExecError::Failed { code, .. } => *code,
      ExecError::Spawn { .. } => None,
    }
  }
}

/// A program plus its arguments, as plain data.
///
/// Base arguments are part of the declared toolchain (e.g. `apt-get install
/// -y`); per-invocation arguments are appended at the call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandLine {
  pub program: String,
  #[serde(default)]
  pub args: Vec<String>,
}

impl CommandLine {
  pub fn new(program: impl Into<String>) -> Self {
    CommandLine {
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }
}

impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Run a command to completion in the given working directory.
///
/// Blocking in pipeline terms: this awaits the child's exit before returning,
/// and there is no timeout — a hung child blocks the pipeline indefinitely.
/// Stdout and stderr are inherited so toolchain output streams through.
pub async fn run(cmd: &CommandLine, cwd: &Path) -> Result<(), ExecError> {
  info!(cmd = %cmd, cwd = %cwd.display(), "running");

  let status = Command::new(&cmd.program)
    .args(&cmd.args)
    .current_dir(cwd)
    .status()
    .await
    .map_err(|e| ExecError::Spawn {
      cmd: cmd.to_string(),
      source: e,
    })?;

  if !status.success() {
    return Err(ExecError::Failed {
      cmd: cmd.to_string(),
      code: status.code(),
    });
  }

  debug!(cmd = %cmd, "completed");
  Ok(())
}
