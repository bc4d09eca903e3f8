mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use commands::hash;
use filehash_core::config::{load_config, load_config_from};
use filehash_core::Processor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "filehash")]
#[command(about = "Fingerprint supported files with SHA-256, one file or a whole folder tree", long_about = None)]
struct Cli {
    /// File or folder to hash (prompted for when omitted)
    path: Option<String>,

    /// Print a JSON report instead of status lines
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            println!("{}", format!("Error: {:#}", err).red());
            ExitCode::from(hash::EXIT_INPUT_REJECTED)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(file) => load_config_from(Some(file.as_path())),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    log::debug!("Loaded configuration: {:?}", config);
    let processor = Processor::new(config.supported_extensions());

    let raw_path = match cli.path {
        Some(path) => path,
        None => hash::prompt_for_path().context("Failed to read path from stdin")?,
    };

    hash::run(&processor, Path::new(&raw_path), cli.json)
}
