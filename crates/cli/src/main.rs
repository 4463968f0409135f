use anyhow::Result;
use buildprep_lib::manifest::BootstrapManifest;
use buildprep_lib::pipeline::{self, BootstrapOptions};
use clap::Parser;
use console::{Term, style};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// buildprep - prepare an out-of-source build and delegate compilation
///
/// Run from the repo root: ensures build/ exists, shallow-clones any missing
/// third-party source dependencies into src/3rdparty/, then generates build
/// configuration and compiles.
#[derive(Parser)]
#[command(name = "buildprep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Install required system packages first (one elevated package-manager call)
    #[arg(long)]
    install: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info so the commands about to run are echoed; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let cli = Cli::parse();
    let term = Term::stderr();

    let root = dunce::canonicalize(std::env::current_dir()?)?;
    debug!(root = %root.display(), "resolved repo root");

    term.write_line(&format!(
        "{} Preparing build in {}",
        style("::").cyan().bold(),
        root.display()
    ))?;

    let manifest = BootstrapManifest::default();
    let options = BootstrapOptions {
        install_packages: cli.install,
    };

    let report = match pipeline::run(&root, &manifest, &options).await {
        Ok(report) => report,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
            std::process::exit(e.exit_code());
        }
    };

    if report.packages_installed {
        term.write_line(&format!(
            "{} System packages installed",
            style("::").cyan().bold()
        ))?;
    }
    term.write_line(&format!(
        "{} Build directory {}",
        style("::").cyan().bold(),
        if report.build_dir_created {
            "created"
        } else {
            "reused"
        }
    ))?;
    term.write_line(&format!(
        "{} Dependencies: {} fetched, {} already present",
        style("::").cyan().bold(),
        report.fetched.len(),
        report.already_present.len()
    ))?;
    term.write_line(&format!("{} Done!", style("::").green().bold()))?;

    Ok(())
}
