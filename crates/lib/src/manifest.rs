//! The declared bootstrap manifest.
//!
//! Everything the pipeline acts on is declared here as plain data: the OS
//! package list, the third-party source dependency table, and the external
//! toolchain programs the pipeline delegates to. The set is fixed per run;
//! nothing is discovered dynamically.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exec::CommandLine;

/// Subdirectory of the repo root that holds vendored source dependencies.
pub const THIRD_PARTY_SUBDIR: &str = "src/3rdparty";

/// Subdirectory of the repo root used as the out-of-source build directory.
pub const BUILD_SUBDIR: &str = "build";

/// Errors raised by manifest validation.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Two dependencies resolved to the same local subpath.
  #[error("duplicate local subpath '{0}' in dependency table")]
  DuplicateSubpath(String),

  /// A local subpath tried to escape the third-party directory.
  #[error("dependency '{name}' has a non-relative local subpath: {subpath}")]
  InvalidSubpath { name: String, subpath: String },
}

/// One required external source tree.
///
/// `local_subpath` is relative to the third-party directory; presence of that
/// directory on disk is the fetch precondition, regardless of its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySpec {
  pub name: String,
  pub source_url: String,
  pub local_subpath: String,
}

impl DependencySpec {
  pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
    let name = name.into();
    DependencySpec {
      local_subpath: name.clone(),
      name,
      source_url: source_url.into(),
    }
  }

  /// Absolute path of this dependency under the given third-party directory.
  pub fn local_path(&self, third_party_dir: &Path) -> PathBuf {
    third_party_dir.join(&self.local_subpath)
  }
}

/// The external programs the pipeline delegates to.
///
/// Each entry is a [`CommandLine`] (program plus base arguments) rather than a
/// bare program name so tests can point the pipeline at stub executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toolchain {
  /// Source-control client used for shallow clones.
  pub scm: CommandLine,

  /// Configuration-generation step; the absolute repo root is appended as its
  /// sole target argument.
  pub configure: CommandLine,

  /// Compilation step, invoked with no arguments.
  pub compile: CommandLine,

  /// Package-manager install command (package names are appended).
  pub package_manager: CommandLine,

  /// Privilege-elevation prefix for the package manager, if any.
  pub elevate: Option<String>,
}

impl Default for Toolchain {
  fn default() -> Self {
    Toolchain {
      scm: CommandLine::new("git"),
      configure: CommandLine::new("cmake"),
      compile: CommandLine::new("make"),
      package_manager: CommandLine::new("apt-get").args(["install", "-y"]),
      elevate: Some("sudo".to_string()),
    }
  }
}

/// The complete declared set for one bootstrap run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapManifest {
  /// OS packages required for compilation (installer stage only).
  pub packages: Vec<String>,

  /// Third-party source trees, fetched in declaration order.
  pub dependencies: Vec<DependencySpec>,

  pub tools: Toolchain,
}

impl Default for BootstrapManifest {
  fn default() -> Self {
    BootstrapManifest {
      packages: [
        "cmake",
        "make",
        "g++",
        "libboost-dev",
        "libdouble-conversion-dev",
        "libgc-dev",
        "libgsl-dev",
        "libgtkmm-3.0-dev",
        "liblcms2-dev",
        "libpng-dev",
        "libpoppler-glib-dev",
        "libpotrace-dev",
        "libxslt1-dev",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
      dependencies: vec![
        DependencySpec::new("2geom", "https://gitlab.com/inkscape/lib2geom.git"),
        DependencySpec::new("libcroco", "https://gitlab.gnome.org/GNOME/libcroco.git"),
      ],
      tools: Toolchain::default(),
    }
  }
}

impl BootstrapManifest {
  /// Check the dependency table invariants: every local subpath is relative,
  /// stays under the third-party directory, and is unique.
  pub fn validate(&self) -> Result<(), ManifestError> {
    let mut seen = Vec::with_capacity(self.dependencies.len());

    for dep in &self.dependencies {
      let path = Path::new(&dep.local_subpath);
      let escapes = path.components().any(|c| {
        matches!(
          c,
          Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
      });
      if dep.local_subpath.is_empty() || escapes {
        return Err(ManifestError::InvalidSubpath {
          name: dep.name.clone(),
          subpath: dep.local_subpath.clone(),
        });
      }

      if seen.contains(&dep.local_subpath.as_str()) {
        return Err(ManifestError::DuplicateSubpath(dep.local_subpath.clone()));
      }
      seen.push(dep.local_subpath.as_str());
    }

    Ok(())
  }
}
