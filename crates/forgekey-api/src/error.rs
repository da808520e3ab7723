//! Error types for API operations.

use forgekey_core::{AccountId, IdentityError};

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success HTTP status.
    #[error("Server returned HTTP {0}")]
    Status(u16),

    /// The account has no token to authenticate with.
    #[error("No token available for account {0}")]
    MissingToken(AccountId),

    /// Response did not carry the expected data.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<Error> for IdentityError {
    fn from(error: Error) -> Self {
        match error {
            Error::Status(status) => Self::Status(status),
            Error::MissingToken(id) => Self::MissingToken(id),
            Error::InvalidResponse(message) => Self::InvalidResponse(message),
            Error::Http(e) => Self::transport(e),
            Error::Url(e) => Self::transport(e),
        }
    }
}
