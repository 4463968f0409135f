//! Directory provisioner stage.
//!
//! Ensures `<root>/build` exists, creating it at most once per invocation.
//! Existing contents are never inspected or cleared; stale artifacts from a
//! prior run are the downstream toolchain's concern (incremental build
//! semantics are delegated, not reimplemented here).

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::BootstrapError;
use crate::manifest::BUILD_SUBDIR;

/// Ensure the build directory exists. Returns whether it was created.
///
/// Single-level creation: the parent root is assumed to exist, since it is
/// where the tool was invoked from.
pub fn provision(root: &Path) -> Result<bool, BootstrapError> {
  let build_dir = root.join(BUILD_SUBDIR);

  if build_dir.is_dir() {
    debug!(path = %build_dir.display(), "build directory already exists");
    return Ok(false);
  }

  fs::create_dir(&build_dir).map_err(|source| BootstrapError::CreateBuildDir {
    path: build_dir.clone(),
    source,
  })?;

  info!(path = %build_dir.display(), "created build directory");
  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn creates_build_dir_when_absent() {
    let temp = TempDir::new().unwrap();

    let created = provision(temp.path()).unwrap();

    assert!(created);
    assert!(temp.path().join("build").is_dir());
  }

  #[test]
  fn existing_build_dir_is_a_silent_noop() {
    let temp = TempDir::new().unwrap();
    let build_dir = temp.path().join("build");
    fs::create_dir(&build_dir).unwrap();
    fs::write(build_dir.join("stale.o"), b"artifact").unwrap();

    let created = provision(temp.path()).unwrap();

    assert!(!created);
    // Contents are never cleared.
    assert!(build_dir.join("stale.o").exists());
  }

  #[test]
  fn second_provision_does_not_recreate() {
    let temp = TempDir::new().unwrap();

    assert!(provision(temp.path()).unwrap());
    assert!(!provision(temp.path()).unwrap());
  }

  #[test]
  fn missing_parent_is_fatal() {
    let temp = TempDir::new().unwrap();
    let nonexistent_root = temp.path().join("no-such-root");

    let err = provision(&nonexistent_root).unwrap_err();
    assert!(matches!(err, BootstrapError::CreateBuildDir { .. }));
  }
}
