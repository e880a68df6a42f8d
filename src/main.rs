//! regroup - Entry Point

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// regroup - reorder grouped items by dragging them in the terminal
#[derive(Parser, Debug)]
#[command(name = "regroup")]
#[command(version)]
#[command(about = "Drag-and-drop reordering of grouped items, persisted to a JSON store")]
pub struct Args {
    /// Path to the JSON store file (or set REGROUP_STORE / store_path)
    pub store: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Start with every group collapsed
    #[arg(long)]
    pub collapse_all: bool,

    /// Check the store's ordering invariants, print the list and exit
    #[arg(long)]
    pub check: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = regroup::config::load_config_with_precedence(args.config.clone())?;
        let merged = regroup::config::merge_config(config_file);
        let with_env = regroup::config::apply_env_overrides(merged);
        regroup::config::apply_cli_overrides(
            with_env,
            args.store.clone(),
            args.collapse_all,
            args.no_color,
        )
    };

    if args.check {
        let path = config.require_store_path()?;
        let report = regroup::check::check_store(path)?;
        println!("{report}");
        return Ok(if report.is_consistent() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    regroup::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    regroup::view::run_with_store(&config)?;
    Ok(ExitCode::SUCCESS)
}
