//! # forgekey-api
//!
//! REST API client for code-hosting servers, used by `forgekey` to find out
//! which user an account's token belongs to.
//!
//! ## Quick Start
//!
//! ```ignore
//! use forgekey_api::{ApiConfig, HttpIdentityResolver};
//! use forgekey_core::{CredentialResolver, IdentityResolver};
//!
//! let directory = Arc::new(repo.load_directory().await?);
//! let identity = HttpIdentityResolver::new(directory.clone(), &ApiConfig::default())?;
//!
//! // Ask the server who the token belongs to
//! let login = identity.username(&account).await?;
//!
//! // Or let the resolver pick an account for a remote URL
//! let resolver = CredentialResolver::new(directory, identity);
//! let auth = resolver.get_auth_data(&context, "https://github.com/owner/repo.git").await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod user;

pub use config::{ApiConfig, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use user::HttpIdentityResolver;
