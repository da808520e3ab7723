//! Username lookup through the server's REST API.

use std::collections::HashMap;

use forgekey_core::{Account, AccountDirectory, AccountId, IdentityResolver, IdentityResult};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Media type requested from the API.
const API_MEDIA_TYPE: &str = "application/vnd.github+json";

/// The part of `GET /user` we care about.
#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

/// Resolves account usernames with `GET {api}/user`.
///
/// Tokens come from the account directory. Successful lookups are cached per
/// account until [`invalidate`](Self::invalidate) or
/// [`clear_cache`](Self::clear_cache) is called.
pub struct HttpIdentityResolver<D> {
    client: Client,
    directory: D,
    cache: RwLock<HashMap<AccountId, String>>,
}

impl<D: AccountDirectory> HttpIdentityResolver<D> {
    /// Creates a resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(directory: D, config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            directory,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Forget the cached username of an account.
    pub async fn invalidate(&self, account: &Account) {
        self.cache.write().await.remove(&account.id);
    }

    /// Forget all cached usernames.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    async fn fetch_username(&self, account: &Account) -> Result<String> {
        let token = self
            .directory
            .token_for_account(account)
            .ok_or(Error::MissingToken(account.id))?;

        let url = Url::parse(&format!("{}/user", account.server.api_url()))?;
        debug!("Fetching username for {account} from {url}");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", token.expose_secret()))
            .header(ACCEPT, API_MEDIA_TYPE)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let user: UserResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(format!("unexpected user payload: {e}")))?;
        if user.login.is_empty() {
            return Err(Error::InvalidResponse("empty login".into()));
        }
        Ok(user.login)
    }
}

impl<D: AccountDirectory> IdentityResolver for HttpIdentityResolver<D> {
    async fn username(&self, account: &Account) -> IdentityResult<String> {
        if let Some(username) = self.cache.read().await.get(&account.id) {
            return Ok(username.clone());
        }

        let username = self.fetch_username(account).await?;
        self.cache
            .write()
            .await
            .insert(account.id, username.clone());
        Ok(username)
    }
}
