//! # forgekey-core
//!
//! Core logic for `forgekey`, a credential helper for code-hosting servers.
//!
//! This crate provides:
//! - Account model and server descriptors with URL matching
//! - Account storage (`SQLite`) with per-context default accounts
//! - Token storage in the system keyring
//! - **Credential resolution** - which account, if any, authenticates a request

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
mod error;
pub mod resolve;

pub use account::credentials;
pub use account::{
    Account, AccountDirectory, AccountId, AccountRepository, CallerContext, CredentialError,
    CredentialResult, KeyringTokenStore, LoadedDirectory, MemoryTokenStore, Scheme, ServerPath,
    TokenStore,
};
pub use error::{Error, Result};
pub use resolve::{
    AuthData, CredentialResolver, IdentityError, IdentityResolver, IdentityResult,
};
