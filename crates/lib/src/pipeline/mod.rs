//! The linear bootstrap pipeline.
//!
//! Stages run strictly in order, each one idempotent on its own:
//!
//! ```text
//! START -> PACKAGES_DONE (or SKIPPED) -> DIR_READY -> DEPS_READY
//!       -> CONFIGURED -> BUILT
//! ```
//!
//! The first failing stage terminates the run; there is no recovery
//! transition, the whole pipeline is re-invoked from the start. An exclusive
//! advisory lock on the repo root is held for the duration so two
//! simultaneous runs cannot race on directory creation or cloning.

pub mod build;
pub mod builddir;
pub mod fetch;
pub mod packages;

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::error::BootstrapError;
use crate::lock::RootLock;
use crate::manifest::BootstrapManifest;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Packages,
  BuildDir,
  Dependencies,
  Configure,
  Compile,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Packages => "packages",
      Stage::BuildDir => "build-dir",
      Stage::Dependencies => "dependencies",
      Stage::Configure => "configure",
      Stage::Compile => "compile",
    };
    write!(f, "{name}")
  }
}

/// Per-run options from the CLI surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
  /// Run the package-installer stage (`--install`). When false the stage is
  /// skipped entirely, not run as an empty install.
  pub install_packages: bool,
}

/// What a successful run actually did, stage by stage.
#[derive(Debug, Default)]
pub struct BootstrapReport {
  pub packages_installed: bool,
  pub build_dir_created: bool,
  /// Dependencies cloned this run, in declaration order.
  pub fetched: Vec<String>,
  /// Dependencies whose local subpath already existed and were skipped.
  pub already_present: Vec<String>,
}

/// Run the whole pipeline against `root`.
///
/// `root` is the absolute repo root, fixed for the duration of the run. Every
/// external invocation receives its working directory explicitly; no ambient
/// process state is mutated.
pub async fn run(
  root: &Path,
  manifest: &BootstrapManifest,
  options: &BootstrapOptions,
) -> Result<BootstrapReport, BootstrapError> {
  manifest.validate()?;

  let command = if options.install_packages {
    "buildprep --install"
  } else {
    "buildprep"
  };
  let _lock = RootLock::acquire(root, command)?;

  let mut report = BootstrapReport::default();

  if options.install_packages {
    info!(stage = %Stage::Packages, "installing system packages");
    packages::install(root, &manifest.tools, &manifest.packages).await?;
    report.packages_installed = true;
  } else {
    debug!(stage = %Stage::Packages, "not requested, skipping");
  }

  info!(stage = %Stage::BuildDir, "provisioning build directory");
  report.build_dir_created = builddir::provision(root)?;

  info!(stage = %Stage::Dependencies, "checking third-party dependencies");
  let outcome = fetch::ensure_dependencies(root, manifest).await?;
  report.fetched = outcome.fetched;
  report.already_present = outcome.already_present;

  info!(stage = %Stage::Configure, "generating build configuration");
  build::configure(root, &manifest.tools).await?;

  info!(stage = %Stage::Compile, "compiling");
  build::compile(root, &manifest.tools).await?;

  Ok(report)
}
