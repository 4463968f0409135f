//! Dependency fetcher stage.
//!
//! For each declared dependency, in declaration order: if its local subpath
//! exists as a directory it is accepted as-is (presence alone satisfies the
//! precondition, staleness and integrity are not checked); otherwise a
//! shallow clone is run with the working directory set to the third-party
//! directory. The first fetch failure aborts the run.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::BootstrapError;
use crate::exec;
use crate::manifest::{BootstrapManifest, THIRD_PARTY_SUBDIR};

/// Which dependencies a run actually fetched versus found on disk.
#[derive(Debug, Default)]
pub struct FetchOutcome {
  pub fetched: Vec<String>,
  pub already_present: Vec<String>,
}

/// Ensure every declared dependency is present under `<root>/src/3rdparty`.
///
/// The vendor directory itself is created (with parents) when absent so a
/// pristine checkout bootstraps without manual steps.
pub async fn ensure_dependencies(
  root: &Path,
  manifest: &BootstrapManifest,
) -> Result<FetchOutcome, BootstrapError> {
  let third_party = root.join(THIRD_PARTY_SUBDIR);

  if !third_party.is_dir() {
    fs::create_dir_all(&third_party).map_err(|source| BootstrapError::CreateVendorDir {
      path: third_party.clone(),
      source,
    })?;
    debug!(path = %third_party.display(), "created third-party directory");
  }

  let mut outcome = FetchOutcome::default();

  for dep in &manifest.dependencies {
    let dest = dep.local_path(&third_party);

    if dest.is_dir() {
      debug!(name = %dep.name, path = %dest.display(), "already present, skipping");
      outcome.already_present.push(dep.name.clone());
      continue;
    }

    info!(name = %dep.name, url = %dep.source_url, "fetching");
    let cmd = manifest
      .tools
      .scm
      .clone()
      .args(["clone", "--depth", "1"])
      .arg(dep.source_url.as_str())
      .arg(dep.local_subpath.as_str());

    exec::run(&cmd, &third_party)
      .await
      .map_err(|source| BootstrapError::Fetch {
        name: dep.name.clone(),
        source,
      })?;

    outcome.fetched.push(dep.name.clone());
  }

  Ok(outcome)
}
