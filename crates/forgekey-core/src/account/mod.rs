//! Account management module.
//!
//! Provides the account model, server descriptors, token storage, the
//! persistent account repository and the read-only directory view used
//! for credential resolution.

pub mod credentials;
mod directory;
mod model;
mod repository;
mod server;

pub use credentials::{
    CredentialError, CredentialResult, KeyringTokenStore, MemoryTokenStore, TokenStore,
};
pub use directory::{AccountDirectory, LoadedDirectory};
pub use model::{Account, AccountId, CallerContext};
pub use repository::AccountRepository;
pub use server::{Scheme, ServerPath};
