//! The pipeline's error taxonomy.
//!
//! Every failure is fatal and surfaces immediately; there is no retry or
//! partial-success handling anywhere. Each variant records which stage failed,
//! and [`BootstrapError::exit_code`] preserves the child process's exit code
//! so the CLI can propagate it unchanged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::exec::ExecError;
use crate::lock::LockError;
use crate::manifest::ManifestError;

#[derive(Debug, Error)]
pub enum BootstrapError {
  /// The elevated package-manager invocation failed.
  #[error("package installation failed: {source}")]
  PackageInstall {
    #[source]
    source: ExecError,
  },

  /// The build directory could not be created.
  #[error("failed to create build directory '{path}': {source}")]
  CreateBuildDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The third-party vendor directory could not be created.
  #[error("failed to create third-party directory '{path}': {source}")]
  CreateVendorDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A dependency clone failed (network, auth, disk).
  #[error("failed to fetch dependency '{name}': {source}")]
  Fetch {
    name: String,
    #[source]
    source: ExecError,
  },

  /// The configuration-generation step exited non-zero.
  #[error("build configuration failed: {source}")]
  Configure {
    #[source]
    source: ExecError,
  },

  /// The compilation step exited non-zero.
  #[error("compilation failed: {source}")]
  Compile {
    #[source]
    source: ExecError,
  },

  #[error(transparent)]
  Lock(#[from] LockError),

  #[error(transparent)]
  Manifest(#[from] ManifestError),
}

impl BootstrapError {
  /// The exit code the process should terminate with.
  ///
  /// Where a child process failed with a code, that code is propagated
  /// unchanged; everything else maps to 1.
  pub fn exit_code(&self) -> i32 {
    let child_code = match self {
      BootstrapError::PackageInstall { source }
      | BootstrapError::Fetch { source, .. }
      | BootstrapError::Configure { source }
      | BootstrapError::Compile { source } => source.exit_code(),
      _ => None,
    };
    child_code.unwrap_or(1)
  }
}
