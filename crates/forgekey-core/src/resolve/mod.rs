//! Credential resolution.
//!
//! Picks the stored account to authenticate an outbound request with, based
//! on the request URL, an optional requested login and the caller context's
//! default account.

mod identity;
mod resolver;

pub use identity::{IdentityError, IdentityResolver, IdentityResult};
pub use resolver::{AuthData, CredentialResolver};
