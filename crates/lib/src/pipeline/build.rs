//! Build invoker stage.
//!
//! Pure two-step delegation with fail-fast semantics: generate build
//! configuration into the build directory, then compile. Both run with the
//! working directory set to the build directory; compilation is never
//! attempted if configuration failed. Output is not parsed.

use std::path::Path;

use crate::error::BootstrapError;
use crate::exec;
use crate::manifest::{BUILD_SUBDIR, Toolchain};

/// Run the configuration-generation step, passing the absolute repo root as
/// its sole target argument.
pub async fn configure(root: &Path, tools: &Toolchain) -> Result<(), BootstrapError> {
  let build_dir = root.join(BUILD_SUBDIR);
  let cmd = tools.configure.clone().arg(root.to_string_lossy());

  exec::run(&cmd, &build_dir)
    .await
    .map_err(|source| BootstrapError::Configure { source })
}

/// Run the compilation step with no arguments; it relies entirely on the
/// configuration step's output.
pub async fn compile(root: &Path, tools: &Toolchain) -> Result<(), BootstrapError> {
  let build_dir = root.join(BUILD_SUBDIR);

  exec::run(&tools.compile, &build_dir)
    .await
    .map_err(|source| BootstrapError::Compile { source })
}
