//! Text fetch transport.
//!
//! Pipeline stages only need "give me the body of this URL as text", so they
//! are generic over [`Transport`]. Production code uses [`HttpTransport`];
//! tests substitute in-memory implementations.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::TransportOptions;
use crate::error::{InterlinkError, Result};

/// User-Agent string for all requests.
const USER_AGENT: &str = concat!("interlink/", env!("CARGO_PKG_VERSION"));

/// Fetches a resource as text.
///
/// Implementations report non-success statuses and transport failures
/// (including timeouts) as [`InterlinkError::Fetch`].
pub trait Transport: Send + Sync {
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client with the configured timeout and redirect policy.
    pub fn new(opts: &TransportOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| InterlinkError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InterlinkError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InterlinkError::status(url, status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| InterlinkError::fetch(url, format!("failed to read body: {e}")))
    }
}
