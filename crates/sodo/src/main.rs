use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract {
            file,
            json,
            context,
        } => cli::run_extract(&file, json, context),
        Commands::Normalize { file } => cli::run_normalize(&file),
        Commands::Fields => cli::run_fields(),
    }
}
