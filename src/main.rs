use anyhow::Result;
use clap::Parser;
use log::debug;
use std::env;
use std::path::PathBuf;

use verbump::cli::Orchestrator;
use verbump::config;
use verbump::git::Git2Repository;
use verbump::manifest::ManifestSource;
use verbump::package_manager::NpmCommand;
use verbump::ui::{self, InquirePrompter};
use verbump::BumpError;

#[derive(clap::Parser)]
#[command(
    name = "verbump",
    version,
    about = "Bump the package.json version and tag releases interactively"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Print debug logs")]
    debug: bool,
}

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Warn
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("verbump")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logger(args.debug)?;

    let cwd = env::current_dir()?;

    // Load configuration
    let config = match config::load_config(args.config.as_deref(), &cwd) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let manifest = ManifestSource::new(config.manifest_path(&cwd));
    let project_dir = manifest.project_dir().to_path_buf();

    // Manifest errors are reported before anything touches git
    if let Err(e) = manifest.read_current() {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    let repo = match Git2Repository::open(&project_dir) {
        Ok(repo) => repo,
        Err(e) => {
            let err = BumpError::command(format!("Cannot open git repository: {}", e));
            ui::display_error(&err.to_string());
            return Ok(());
        }
    };
    let npm = NpmCommand::new(config.package_manager.program.clone(), project_dir);
    let prompter = InquirePrompter;

    match Orchestrator::new(&config, manifest, &repo, &npm, &prompter).run() {
        Ok(outcome) => {
            debug!("run finished: {:?}", outcome);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
