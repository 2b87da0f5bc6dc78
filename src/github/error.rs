//! GitHub-specific error handling.

use thiserror::Error;

/// GitHub REST API errors.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// The request could not be sent or the connection failed.
    #[error("Network error talking to GitHub ({url})")]
    Network {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// GitHub answered with a non-success status.
    #[error("GitHub returned HTTP {status} for {url}: {message}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, trimmed.
        message: String,
    },

    /// The response body was not what the endpoint documents.
    #[error("Invalid response format from GitHub ({url})")]
    InvalidResponse {
        /// Requested URL.
        url: String,
        /// Decoding error.
        #[source]
        source: reqwest::Error,
    },

    /// A file fetched through the contents API could not be decoded.
    #[error("Failed to decode {path} from GitHub contents API: {reason}")]
    Decode {
        /// Repository path of the file.
        path: String,
        /// What went wrong.
        reason: String,
    },
}

impl GitHubError {
    /// Returns whether the error is a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
