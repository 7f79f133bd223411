//! `schema-cache` binary.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use client::RegistryClient;
use config::Config;
use schema_cache_cli::{execute, init_config, load_config, Cli, Commands, Output};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    logging::init(&config.logging)?;
    logging::trace("cli", &format!("→ {:?} against {}", cli.cmd, config.registry.url));

    if cli.cmd == Commands::InitConfig {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        init_config(&config, &path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let client = RegistryClient::from_config(&config)?;
    match execute(&cli.cmd, &client, &config.serde).await? {
        Output::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Output::Framed(bytes) => match &cli.cmd {
            Commands::Encode { output: Some(path), .. } => std::fs::write(path, &bytes)?,
            _ => std::io::stdout().write_all(&bytes)?,
        },
    }
    Ok(())
}
