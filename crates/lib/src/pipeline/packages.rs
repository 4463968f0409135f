//! Package installer stage.
//!
//! One elevated package-manager invocation installing the fixed package list.
//! A non-zero exit is fatal with the child's code preserved; a partially
//! installed dependency set is not recoverable by this tool, so there is no
//! retry and no per-package handling.

use std::path::Path;

use crate::error::BootstrapError;
use crate::exec::{self, CommandLine};
use crate::manifest::Toolchain;

/// Build the single install command: elevation prefix (if any), the package
/// manager with its base arguments, then every package name.
pub fn install_command(tools: &Toolchain, packages: &[String]) -> CommandLine {
  let cmd = match &tools.elevate {
    Some(elevate) => CommandLine::new(elevate.as_str())
      .arg(tools.package_manager.program.as_str())
      .args(tools.package_manager.args.iter().cloned()),
    None => tools.package_manager.clone(),
  };
  cmd.args(packages.iter().cloned())
}

pub async fn install(
  root: &Path,
  tools: &Toolchain,
  packages: &[String],
) -> Result<(), BootstrapError> {
  let cmd = install_command(tools, packages);
  exec::run(&cmd, root)
    .await
    .map_err(|source| BootstrapError::PackageInstall { source })
}
