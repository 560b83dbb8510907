use anyhow::{Context, Result};

use crate::batch::Batch;
use crate::config::Config;
use crate::error::{IngestError, IngestResult};

/// Where finished batches go. The pipeline only needs push-as-a-unit
/// semantics; tests substitute a recording sink.
pub trait BatchSink {
    fn push(&self, batch: &Batch) -> IngestResult<()>;
}

/// Pushes batches to a Warp10 ingestion endpoint over HTTP.
pub struct Warp10Client {
    http: reqwest::blocking::Client,
    update_url: String,
    endpoint: String,
    token: String,
}

impl Warp10Client {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            update_url: format!("{endpoint}/api/v0/update"),
            endpoint,
            token: config.token.clone(),
        })
    }

    fn transport(&self, reason: String) -> IngestError {
        IngestError::Transport {
            endpoint: self.endpoint.clone(),
            reason,
        }
    }
}

impl BatchSink for Warp10Client {
    fn push(&self, batch: &Batch) -> IngestResult<()> {
        let body = batch.to_update_body();
        let response = self
            .http
            .post(&self.update_url)
            .header("X-Warp10-Token", &self.token)
            .body(body)
            .send()
            .map_err(|err| self.transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            let detail = detail.trim();
            return Err(self.transport(if detail.is_empty() {
                format!("endpoint returned {status}")
            } else {
                format!("endpoint returned {status}: {detail}")
            }));
        }
        tracing::debug!(datapoints = batch.len(), "pushed batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_url_strips_trailing_slash() {
        let config = Config {
            endpoint: "https://warp.example.com/".to_string(),
            token: "t".to_string(),
        };
        let client = Warp10Client::new(&config).expect("client");
        assert_eq!(client.update_url, "https://warp.example.com/api/v0/update");
    }
}
