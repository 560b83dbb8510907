use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

const CONFIG_FILE_NAME: &str = "config.json";

/// Process-wide ingestion settings, loaded once at startup and immutable
/// afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub endpoint: String,
    pub token: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            bail!("config token must not be empty");
        }
        Url::parse(&self.endpoint)
            .with_context(|| format!("config endpoint {:?} is not a valid URL", self.endpoint))?;
        Ok(())
    }
}

/// Resolution order: `--config` flag, then `SIMLOG_CONFIG_PATH`, then
/// `config.json` next to the running executable.
pub fn resolve_config_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Ok(path) = std::env::var("SIMLOG_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    Ok(executable_dir()?.join(CONFIG_FILE_NAME))
}

/// Directory holding the running executable; also the default scan
/// directory, matching where the instrument drops its logs.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to resolve executable path")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(dir.to_path_buf())
}
