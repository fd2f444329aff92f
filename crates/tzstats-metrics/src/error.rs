//! Collection error types.

use thiserror::Error;
use tzstats_client::ClientError;

/// Result type alias for a collection pass.
pub type CollectResult<T> = Result<T, CollectError>;

/// Errors that abort a whole collection pass.
///
/// Per-account failures never surface here; they are logged and the
/// account is skipped.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to fetch chain tip: {0}")]
    Tip(#[source] ClientError),
}
