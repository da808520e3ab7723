//! Selection of the account to authenticate a request with.

use std::collections::HashSet;

use secrecy::SecretString;
use tracing::{debug, info};

use super::identity::IdentityResolver;
use crate::account::{Account, AccountDirectory, CallerContext};

/// Username and secret to authenticate a request with.
#[derive(Debug, Clone)]
pub struct AuthData {
    /// Username to present to the server.
    pub username: String,
    /// Secret token of the selected account.
    pub secret: SecretString,
}

impl AuthData {
    /// Creates auth data.
    #[must_use]
    pub fn new(username: impl Into<String>, secret: SecretString) -> Self {
        Self {
            username: username.into(),
            secret,
        }
    }
}

/// Decides which stored account, if any, applies to a request URL.
///
/// Candidates are the accounts whose server matches the URL, optionally
/// narrowed to those whose current username equals a requested login. When
/// the caller context's default account is among the candidates it wins
/// outright. Identity lookup failures only ever remove candidates.
pub struct CredentialResolver<D, I> {
    directory: D,
    identity: I,
}

impl<D, I> CredentialResolver<D, I>
where
    D: AccountDirectory,
    I: IdentityResolver,
{
    /// Create a resolver over an account directory and identity resolver.
    pub const fn new(directory: D, identity: I) -> Self {
        Self {
            directory,
            identity,
        }
    }

    /// Auth data for `url` when exactly one account applies.
    ///
    /// The username is looked up from the account; a failed lookup yields `None`.
    pub async fn get_auth_data(&self, context: &CallerContext, url: &str) -> Option<AuthData> {
        let account = single(self.get_suitable_accounts(context, url, None).await)?;

        let username = match self.identity.username(&account).await {
            Ok(username) => username,
            Err(e) => {
                info!("Cannot load username for {account}: {e}");
                return None;
            }
        };

        let secret = self.token(&account)?;
        Some(AuthData::new(username, secret))
    }

    /// Auth data for `url` when exactly one account authenticates as `login`.
    pub async fn get_auth_data_for_login(
        &self,
        context: &CallerContext,
        url: &str,
        login: &str,
    ) -> Option<AuthData> {
        let candidates = self.get_suitable_accounts(context, url, Some(login)).await;
        let account = single(candidates)?;
        let secret = self.token(&account)?;
        Some(AuthData::new(login, secret))
    }

    /// All accounts that could authenticate a request to `url`.
    ///
    /// May be empty or ambiguous; see the type-level docs for the rules.
    pub async fn get_suitable_accounts(
        &self,
        context: &CallerContext,
        url: &str,
        login: Option<&str>,
    ) -> HashSet<Account> {
        let mut candidates: Vec<Account> = self
            .directory
            .accounts()
            .into_iter()
            .filter(|account| account.server.matches(url))
            .collect();

        if let Some(login) = login {
            let mut matching = Vec::with_capacity(candidates.len());
            for account in candidates {
                match self.identity.username(&account).await {
                    Ok(username) if username == login => matching.push(account),
                    Ok(username) => debug!("Skipping {account}: signed in as {username}"),
                    Err(e) => info!("Cannot load username for {account}: {e}"),
                }
            }
            candidates = matching;
        }

        if let Some(default) = self.directory.default_account(context)
            && candidates.contains(&default)
        {
            return HashSet::from([default]);
        }

        candidates.into_iter().collect()
    }

    fn token(&self, account: &Account) -> Option<SecretString> {
        let token = self.directory.token_for_account(account);
        if token.is_none() {
            debug!("No token stored for {account}");
        }
        token
    }
}

/// The only member of `accounts`, if it has exactly one.
fn single(accounts: HashSet<Account>) -> Option<Account> {
    if accounts.len() > 1 {
        debug!("{} accounts apply, not choosing one", accounts.len());
        return None;
    }
    accounts.into_iter().next()
}
