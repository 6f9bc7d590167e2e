//! Shardmorph viewer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use shardmorph::{MorphConfig, MorphState, RunError};

/// Metallic shards that morph between a cloud and a tree.
#[derive(Parser, Debug)]
#[command(name = "shardmorph", version, about)]
struct Cli {
    /// JSON config file; defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the particle count
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Start in the formed (tree) state
    #[arg(long)]
    formed: bool,

    /// Seed for a reproducible particle layout
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective config to FILE and exit
    #[arg(long, value_name = "FILE")]
    dump_config: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> Result<MorphConfig, RunError> {
    let mut config = match &cli.config {
        Some(path) => MorphConfig::load(path)?,
        None => MorphConfig::default(),
    };

    if let Some(count) = cli.count {
        config = config.with_particle_count(count);
    }
    if cli.formed {
        config = config.with_initial_state(MorphState::Formed);
    }

    config.validate()?;
    Ok(config)
}

fn try_main(cli: Cli) -> Result<(), RunError> {
    let config = build_config(&cli)?;

    if let Some(path) = &cli.dump_config {
        config.save(path)?;
        log::info!("wrote config to {}", path.display());
        return Ok(());
    }

    shardmorph::run(config, cli.seed)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
