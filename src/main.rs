mod batch;
mod cli;
mod config;
mod content;
mod error;
mod filename;
mod pipeline;
mod push;
mod timeline;

use anyhow::{bail, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;
use crate::push::Warp10Client;

fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,simlog_forwarder=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config_path = config::resolve_config_path(cli.config)?;
    let config = Config::load(&config_path)?;

    let dir = match cli.dir {
        Some(dir) => dir,
        None => config::executable_dir()?,
    };
    tracing::info!(dir = %dir.display(), endpoint = %config.endpoint, "starting run");

    let sink = Warp10Client::new(&config)?;
    let summary = pipeline::run(&dir, &sink, cli.keep_going)?;

    if summary.failed > 0 {
        bail!(
            "run finished with {} failed file(s) out of {} matched",
            summary.failed,
            summary.matched
        );
    }
    Ok(())
}
