//! Account identity lookup.

use std::future::Future;

use crate::account::{Account, AccountId};

/// Why the username of an account could not be determined.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The account has no token to authenticate the lookup with.
    #[error("No token available for account {0}")]
    MissingToken(AccountId),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be sent or its response not read.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status.
    #[error("Server returned HTTP {0}")]
    Status(u16),

    /// The server's answer did not carry a username.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl IdentityError {
    /// Wraps a transport-level error.
    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(error))
    }
}

/// Result type for identity lookups.
pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

/// Maps an account to the username it currently authenticates as.
///
/// Lookups usually hit the network and may fail at any time.
pub trait IdentityResolver: Send + Sync {
    /// Fetch the username of `account`.
    fn username(&self, account: &Account) -> impl Future<Output = IdentityResult<String>> + Send;
}

impl<T: IdentityResolver> IdentityResolver for std::sync::Arc<T> {
    fn username(&self, account: &Account) -> impl Future<Output = IdentityResult<String>> + Send {
        (**self).username(account)
    }
}
