//! HTTP fetcher implementation
//!
//! One HTTP client is built per run and shared by every worker; connection
//! pooling and TLS state live in the client, not the workers. Fetches
//! stream the response body into a pooled buffer and race the run's
//! cancellation token, so shutdown is never stuck behind a slow server.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Connection-dial timeout for every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Total per-request timeout, covering transfer of the whole body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a fetch produced no page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The run was cancelled while the request was in flight. This is the
    /// expected outcome during shutdown, not a failure.
    #[error("fetch cancelled")]
    Canceled,

    /// The server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// Transport-level failure: connect, TLS, timeout, or body read.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    /// True when the error is the expected cancellation outcome.
    pub fn is_canceled(&self) -> bool {
        matches!(self, FetchError::Canceled)
    }
}

/// Builds the HTTP client shared by all workers
///
/// Timeouts are short: a crawler visiting many pages abandons a slow
/// server rather than queueing behind it. Redirects follow reqwest's
/// default policy.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("spinneret/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body into the caller's buffer
///
/// The body is streamed chunk by chunk into `buf` rather than collected
/// into a fresh allocation. A non-2xx status is an error. Cancellation
/// mid-request returns [`FetchError::Canceled`] and may leave partial
/// bytes in the buffer; the caller is expected to discard them.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `buf` - Destination buffer for the body
/// * `cancel` - Run-wide cancellation token
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    buf: &mut Vec<u8>,
    cancel: &CancellationToken,
) -> Result<(), FetchError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(FetchError::Canceled),
        result = fetch_into(client, url, buf) => result,
    }
}

async fn fetch_into(client: &Client, url: &Url, buf: &mut Vec<u8>) -> Result<(), FetchError> {
    let mut response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    while let Some(chunk) = response.chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(())
}
