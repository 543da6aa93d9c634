//! HTTP client for the public findarat listings endpoint.

use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;

/// HTTP client for a single JSON listings endpoint.
///
/// One client per source URL; there is no per-country subtype. Non-2xx
/// responses and bodies that are not a JSON array surface as typed errors.
pub struct FindARatClient {
    client: Client,
    source_url: String,
}

impl FindARatClient {
    /// Creates a client with configured timeout, `User-Agent`, and TLS policy.
    ///
    /// `verify_tls = false` accepts invalid certificates, for sources behind
    /// intercepting proxies.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        source_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        verify_tls: bool,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;

        if !verify_tls {
            tracing::warn!(source_url, "TLS certificate verification is disabled");
        }

        Ok(Self {
            client,
            source_url: source_url.to_owned(),
        })
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Fetches the raw record list.
    ///
    /// Records are returned as untyped JSON objects so the snapshot can be
    /// written verbatim before any parsing.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`]: network or TLS failure, or the body could not be read.
    /// - [`FetchError::UnexpectedStatus`]: any non-2xx status.
    /// - [`FetchError::Deserialize`]: the body is not a JSON array.
    pub async fn fetch_raw(&self) -> Result<Vec<serde_json::Value>, FetchError> {
        let url = self.source_url.clone();
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "listings response received");

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "listings body read");

        serde_json::from_str::<Vec<serde_json::Value>>(&body).map_err(|e| FetchError::Deserialize {
            context: format!("listings from {url}"),
            source: e,
        })
    }
}
