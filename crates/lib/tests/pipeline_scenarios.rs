//! End-to-end pipeline scenarios against a stubbed toolchain.
//!
//! Every external program (scm, configure, compile, package manager) is
//! replaced by a shell stub that appends its arguments to a per-program log
//! file, so the tests can assert exactly which commands ran, in what order,
//! and with which working directory.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use buildprep_lib::error::BootstrapError;
use buildprep_lib::exec::CommandLine;
use buildprep_lib::manifest::{BootstrapManifest, DependencySpec, Toolchain};
use buildprep_lib::pipeline::{self, BootstrapOptions};

struct Harness {
  _temp: TempDir,
  root: PathBuf,
  logs: PathBuf,
  bin: PathBuf,
}

impl Harness {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let logs = temp.path().join("logs");
    let bin = temp.path().join("bin");
    fs::create_dir(&root).unwrap();
    fs::create_dir(&logs).unwrap();
    fs::create_dir(&bin).unwrap();
    Harness {
      _temp: temp,
      root,
      logs,
      bin,
    }
  }

  /// Write an executable stub that logs its arguments, runs `extra`, and
  /// exits with `code`.
  fn stub(&self, name: &str, extra: &str, code: i32) -> PathBuf {
    let path = self.bin.join(name);
    let script = format!(
      "#!/bin/sh\necho \"$@\" >> \"{}/{name}.log\"\n{extra}\nexit {code}\n",
      self.logs.display()
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  fn log(&self, name: &str) -> String {
    fs::read_to_string(self.logs.join(format!("{name}.log"))).unwrap_or_default()
  }

  fn call_count(&self, name: &str) -> usize {
    self.log(name).lines().count()
  }

  /// A manifest with two declared dependencies and every tool stubbed.
  fn manifest(&self) -> BootstrapManifest {
    let clone_extra = "eval \"last=\\${$#}\"\nmkdir -p \"$last\"";
    let scm = self.stub("git", clone_extra, 0);
    let configure = self.stub("cmake", "", 0);
    let compile = self.stub("make", "", 0);
    let package_manager = self.stub("pkg", "", 0);

    BootstrapManifest {
      packages: vec!["cmake".to_string(), "libfoo-dev".to_string()],
      dependencies: vec![
        DependencySpec::new("alpha", "https://example.com/alpha.git"),
        DependencySpec::new("beta", "https://example.com/beta.git"),
      ],
      tools: Toolchain {
        scm: cmdline(&scm),
        configure: cmdline(&configure),
        compile: cmdline(&compile),
        package_manager: cmdline(&package_manager).arg("install"),
        elevate: None,
      },
    }
  }
}

fn cmdline(path: &Path) -> CommandLine {
  CommandLine::new(path.to_string_lossy())
}

fn no_install() -> BootstrapOptions {
  BootstrapOptions {
    install_packages: false,
  }
}

// =============================================================================
// Scenario A: pristine root, --install absent
// =============================================================================

#[tokio::test]
async fn scenario_a_pristine_root() {
  let h = Harness::new();
  let manifest = h.manifest();

  let report = pipeline::run(&h.root, &manifest, &no_install()).await.unwrap();

  assert!(!report.packages_installed);
  assert!(report.build_dir_created);
  assert_eq!(report.fetched, vec!["alpha", "beta"]);
  assert!(report.already_present.is_empty());

  assert!(h.root.join("build").is_dir());
  assert!(h.root.join("src/3rdparty/alpha").is_dir());
  assert!(h.root.join("src/3rdparty/beta").is_dir());

  // Installer skipped entirely.
  assert_eq!(h.call_count("pkg"), 0);

  // Configure got the absolute root as its sole argument; compile got none.
  assert_eq!(h.log("cmake").trim(), h.root.to_string_lossy());
  assert_eq!(h.call_count("make"), 1);
  assert_eq!(h.log("make").trim(), "");
}

// =============================================================================
// Scenario B: everything already present
// =============================================================================

#[tokio::test]
async fn scenario_b_everything_present() {
  let h = Harness::new();
  let manifest = h.manifest();
  fs::create_dir(h.root.join("build")).unwrap();
  fs::create_dir_all(h.root.join("src/3rdparty/alpha")).unwrap();
  fs::create_dir_all(h.root.join("src/3rdparty/beta")).unwrap();

  let report = pipeline::run(&h.root, &manifest, &no_install()).await.unwrap();

  assert!(!report.build_dir_created);
  assert!(report.fetched.is_empty());
  assert_eq!(report.already_present, vec!["alpha", "beta"]);

  // No clone calls, but configure and compile still run unconditionally.
  assert_eq!(h.call_count("git"), 0);
  assert_eq!(h.call_count("cmake"), 1);
  assert_eq!(h.call_count("make"), 1);
}

// =============================================================================
// Scenario C: second dependency clone fails
// =============================================================================

#[tokio::test]
async fn scenario_c_second_clone_fails() {
  let h = Harness::new();
  let mut manifest = h.manifest();
  let failing = h.stub(
    "failing-git",
    "eval \"last=\\${$#}\"\nif [ \"$last\" = beta ]; then exit 33; fi\nmkdir -p \"$last\"",
    0,
  );
  manifest.tools.scm = cmdline(&failing);

  let err = pipeline::run(&h.root, &manifest, &no_install()).await.unwrap_err();

  match &err {
    BootstrapError::Fetch { name, .. } => assert_eq!(name, "beta"),
    other => panic!("expected fetch error, got: {other}"),
  }
  assert_eq!(err.exit_code(), 33);

  // Fail-fast ordering: the build invoker never ran.
  assert_eq!(h.call_count("cmake"), 0);
  assert_eq!(h.call_count("make"), 0);
}

// =============================================================================
// Idempotence and flag gating
// =============================================================================

#[tokio::test]
async fn second_run_is_a_noop_for_provisioning() {
  let h = Harness::new();
  let manifest = h.manifest();

  let first = pipeline::run(&h.root, &manifest, &no_install()).await.unwrap();
  let second = pipeline::run(&h.root, &manifest, &no_install()).await.unwrap();

  assert!(first.build_dir_created);
  assert_eq!(first.fetched, vec!["alpha", "beta"]);

  assert!(!second.build_dir_created);
  assert!(second.fetched.is_empty());
  assert_eq!(second.already_present, vec!["alpha", "beta"]);

  // One clone per dependency across both runs; delegation ran both times.
  assert_eq!(h.call_count("git"), 2);
  assert_eq!(h.call_count("cmake"), 2);
  assert_eq!(h.call_count("make"), 2);
}

#[tokio::test]
async fn install_flag_issues_one_package_manager_command() {
  let h = Harness::new();
  let manifest = h.manifest();
  let options = BootstrapOptions {
    install_packages: true,
  };

  let report = pipeline::run(&h.root, &manifest, &options).await.unwrap();

  assert!(report.packages_installed);
  assert_eq!(h.call_count("pkg"), 1);
  assert_eq!(h.log("pkg").trim(), "install cmake libfoo-dev");
}

#[tokio::test]
async fn without_install_flag_no_package_manager_command_ever_runs() {
  let h = Harness::new();
  let manifest = h.manifest();

  pipeline::run(&h.root, &manifest, &no_install()).await.unwrap();
  pipeline::run(&h.root, &manifest, &no_install()).await.unwrap();

  assert_eq!(h.call_count("pkg"), 0);
}

#[tokio::test]
async fn failed_package_install_stops_the_pipeline() {
  let h = Harness::new();
  let mut manifest = h.manifest();
  let failing = h.stub("failing-pkg", "", 100);
  manifest.tools.package_manager = cmdline(&failing);
  let options = BootstrapOptions {
    install_packages: true,
  };

  let err = pipeline::run(&h.root, &manifest, &options).await.unwrap_err();

  assert!(matches!(err, BootstrapError::PackageInstall { .. }));
  assert_eq!(err.exit_code(), 100);
  assert!(!h.root.join("build").exists());
  assert_eq!(h.call_count("git"), 0);
}

#[tokio::test]
async fn invalid_manifest_fails_before_any_invocation() {
  let h = Harness::new();
  let mut manifest = h.manifest();
  manifest.dependencies[1].local_subpath = "alpha".to_string();

  let err = pipeline::run(&h.root, &manifest, &no_install()).await.unwrap_err();

  assert!(matches!(err, BootstrapError::Manifest(_)));
  assert!(!h.root.join("build").exists());
  assert_eq!(h.call_count("git"), 0);
}
