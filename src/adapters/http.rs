use crate::config::ProviderConfig;
use crate::utils::error::{IeumError, Result};
use reqwest::Client;
use std::time::Duration;

/// GET with per-request timeout and fixed-delay retries, shared by every provider adapter.
#[derive(Debug, Clone)]
pub struct ProviderHttp {
    client: Client,
    domain: &'static str,
    endpoint: String,
    timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl ProviderHttp {
    pub fn new(domain: &'static str, config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            domain,
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_seconds()),
            retry_attempts: config.retry_attempts(),
            retry_delay: Duration::from_secs(config.retry_delay_seconds()),
        }
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Body of a successful response. Transport errors and 5xx are retried; 4xx is not.
    pub async fn get_text(&self, params: &[(&str, String)]) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.send_once(params).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retry_attempts && is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        "🔁 {}: attempt {}/{} failed ({}), retrying in {:?}",
                        self.domain,
                        attempt,
                        self.retry_attempts + 1,
                        e,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn get_json(&self, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let body = self.get_text(params).await?;
        serde_json::from_str(&body).map_err(|e| {
            IeumError::provider(self.domain, format!("response is not valid JSON: {}", e))
        })
    }

    async fn send_once(&self, params: &[(&str, String)]) -> Result<String> {
        tracing::debug!("📡 {}: GET {}", self.domain, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 {}: response status {}", self.domain, status);

        if !status.is_success() {
            return Err(IeumError::ProviderError {
                domain: self.domain.to_string(),
                message: format!("HTTP status {}", status.as_u16()),
            });
        }

        Ok(response.text().await?)
    }
}

fn is_retryable(error: &IeumError) -> bool {
    match error {
        IeumError::ApiError(_) => true,
        IeumError::ProviderError { message, .. } => message.starts_with("HTTP status 5"),
        _ => false,
    }
}
