//! Client error types.

use thiserror::Error;

/// Result type alias for upstream API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the TzStats API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response from {url} is not a JSON object")]
    NotAnObject { url: String },

    #[error("invalid account identifier: {0:?}")]
    InvalidAccount(String),
}
