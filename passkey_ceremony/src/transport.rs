//! Network transport for reaching a remote relying party.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::CeremonyError;

/// Minimal JSON-over-HTTP send capability consumed by the facade. Injected
/// so the facade is testable without a network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CeremonyError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the following settings:
    ///
    /// - `timeout`: 30 seconds, an upper bound preventing indefinite
    ///   hanging; the facade applies the configured per-call window on top.
    /// - `pool_idle_timeout` / `pool_max_idle_per_host`: defaults that
    ///   balance connection reuse against memory.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(32)
                .build()
                .expect("Failed to create reqwest client"),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CeremonyError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CeremonyError::RequestTimeout(format!("Request to {url} timed out"))
                } else {
                    CeremonyError::Transport(format!("Request to {url} failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CeremonyError::Transport(format!(
                "Relying party returned HTTP {status} for {url}"
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CeremonyError::Transport(format!("Invalid JSON response from {url}: {e}")))
    }
}
