use anyhow::Context;
use clap::Parser;
use gov_data_mcp::{Config, Server};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MCP server exposing U.S. legislative, treasury, and economic data APIs
/// as agent tools.
#[derive(Debug, Parser)]
#[command(name = "gov-data-mcp", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(cli: &Cli) {
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gov_data_mcp={default_level}")));

    // Stdout carries the MCP stdio transport; all diagnostics go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    info!("Running gov-data MCP server");
    Server::new(config)
        .run()
        .await
        .context("MCP server exited with an error")?;

    Ok(())
}
