use futures::StreamExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default cap on a single response body (5MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Errors from a single fetch.
///
/// None of these abort a discovery run. Strategies log them and contribute
/// nothing.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the configured size limit
    #[error("Response too large (exceeds {0} bytes)")]
    TooLarge(usize),
    /// The caller cancelled the discovery run
    #[error("Request cancelled")]
    Cancelled,
}

/// HTTP fetch capability shared by every strategy of a discovery run.
///
/// Wraps a `reqwest::Client` (proxy, timeout and TLS are the client's
/// concern) together with the caller's cancellation token. Every request
/// races the token and returns [`FetchError::Cancelled`] as soon as it
/// fires. There are no retries: a failed fetch is reported once.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    cancel: CancellationToken,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// GETs `url` and returns the body bytes of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Cancelled`] if the token fired before the body was read
    /// - [`FetchError::Network`] for transport failures
    /// - [`FetchError::HttpStatus`] for non-2xx responses
    /// - [`FetchError::TooLarge`] if the body exceeds the size limit
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if self.cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(url = %url, "Fetch cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.fetch_bytes(url) => result,
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        read_limited_bytes(response, self.max_body_bytes).await
    }
}

/// Reads a response body, giving up once it exceeds `limit` bytes.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
