//! build-research-completions - Big Ten IPEDS completions research dataset
//!
//! ```bash
//! build-research-completions                         # defaults under ../data
//! build-research-completions --data-root /srv/proj   # defaults under /srv/proj/data
//! build-research-completions --out-path out.csv --bigten-unitids-path ids.csv
//! ```

use clap::Parser;
use ipeds_research::config::DEFAULT_DATA_ROOT;
use ipeds_research::logs::log_error;
use ipeds_research::{build, BuildOptions};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "build-research-completions")]
#[command(
    about = "Build Big Ten IPEDS Completions research dataset (cleaned + joined).",
    long_about = None
)]
struct Cli {
    /// Root the default paths are relative to
    #[arg(long, env = "IPEDS_DATA_ROOT", default_value = DEFAULT_DATA_ROOT)]
    data_root: PathBuf,

    /// Path to IPEDS Completions CSV (e.g., C2024_A.csv)
    #[arg(long)]
    completions_path: Option<PathBuf>,

    /// Path to IPEDS Header/Directory CSV (e.g., HD2024.csv)
    #[arg(long)]
    hd_path: Option<PathBuf>,

    /// Path to CIP taxonomy CSV (e.g., CIPCode2020.csv)
    #[arg(long)]
    cip_path: Option<PathBuf>,

    /// Optional CSV containing Big Ten UNITIDs (column: UNITID). Falls back to
    /// the embedded list if missing
    #[arg(long)]
    bigten_unitids_path: Option<PathBuf>,

    /// Output path for the finalized research CSV
    #[arg(long)]
    out_path: Option<PathBuf>,
}

impl Cli {
    fn into_options(self) -> BuildOptions {
        let defaults = BuildOptions::with_root(&self.data_root);
        BuildOptions {
            completions_path: self.completions_path.unwrap_or(defaults.completions_path),
            hd_path: self.hd_path.unwrap_or(defaults.hd_path),
            cip_path: self.cip_path.unwrap_or(defaults.cip_path),
            bigten_unitids_path: self.bigten_unitids_path.or(defaults.bigten_unitids_path),
            out_path: self.out_path.unwrap_or(defaults.out_path),
            expected_institutions: defaults.expected_institutions,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the build and return the process exit code.
fn run(options: &BuildOptions) -> i32 {
    match build(options) {
        Ok(report) => {
            println!("Wrote: {}", report.out_path.display());
            0
        }
        Err(e) => {
            log_error(format!("Build failed: {}", e));
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_logging();

    let options = Cli::parse().into_options();
    std::process::exit(run(&options));
}
