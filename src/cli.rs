use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "simlog-forwarder",
    version,
    about = "Ships .SIM instrument logs to a Warp10 endpoint and removes ingested files"
)]
pub struct Cli {
    /// Directory to scan for .SIM files (default: the executable's directory).
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Endpoint/token config document (default: config.json next to the executable,
    /// or SIMLOG_CONFIG_PATH).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Log and skip a failing file instead of halting the whole run.
    /// Delete failures still halt.
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,
}
