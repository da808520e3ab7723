//! Git credential helper protocol.
//!
//! Git writes `key=value` lines to the helper's stdin, terminated by a blank
//! line or EOF, and reads the same format back from stdout.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use forgekey_api::{ApiConfig, HttpIdentityResolver};
use forgekey_core::{AccountRepository, AuthData, CallerContext, CredentialResolver};
use secrecy::ExposeSecret;
use tracing::debug;

/// Credential description sent by git.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    /// `protocol` attribute, e.g. `https`.
    pub protocol: Option<String>,
    /// `host` attribute, possibly with a port.
    pub host: Option<String>,
    /// `path` attribute (only sent with `credential.useHttpPath`).
    pub path: Option<String>,
    /// `username` attribute, when the remote URL names a user.
    pub username: Option<String>,
    /// `url` attribute, which git may send instead of the parts above.
    pub url: Option<String>,
}

impl CredentialRequest {
    /// Read a request from the helper's input.
    ///
    /// Unknown attributes and malformed lines are ignored.
    pub fn parse<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut request = Self::default();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                break;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = Some(value.to_string());
            match key {
                "protocol" => request.protocol = value,
                "host" => request.host = value,
                "path" => request.path = value,
                "username" => request.username = value,
                "url" => request.url = value,
                _ => debug!("Ignoring credential attribute {key}"),
            }
        }
        Ok(request)
    }

    /// The remote URL the credential is for, if enough is known to build one.
    pub fn url(&self) -> Option<String> {
        if let Some(url) = self.url.as_ref().filter(|url| !url.is_empty()) {
            return Some(url.clone());
        }

        let host = self.host.as_deref().filter(|host| !host.is_empty())?;
        let protocol = self.protocol.as_deref().unwrap_or("https");
        let mut url = format!("{protocol}://{host}");
        if let Some(path) = self.path.as_deref().filter(|path| !path.is_empty()) {
            url.push('/');
            url.push_str(path.trim_start_matches('/'));
        }
        Some(url)
    }

    /// Requested login, ignoring an empty `username=`.
    pub fn login(&self) -> Option<&str> {
        self.username.as_deref().filter(|login| !login.is_empty())
    }
}

/// Resolve the credential git asked for.
pub async fn resolve(
    repo: &AccountRepository,
    api: &ApiConfig,
    context: &CallerContext,
    request: &CredentialRequest,
) -> Result<Option<AuthData>> {
    let Some(url) = request.url() else {
        debug!("Credential request without host");
        return Ok(None);
    };

    let directory = Arc::new(repo.load_directory().await?);
    let identity = HttpIdentityResolver::new(directory.clone(), api)?;
    let resolver = CredentialResolver::new(directory, identity);

    let auth = match request.login() {
        Some(login) => resolver.get_auth_data_for_login(context, &url, login).await,
        None => resolver.get_auth_data(context, &url).await,
    };
    debug!(
        "Resolved {url} for {context}: {}",
        auth.as_ref().map_or("no credential", |_| "found")
    );
    Ok(auth)
}

/// Write a credential in helper output format.
pub fn write_auth<W: Write>(mut out: W, auth: &AuthData) -> io::Result<()> {
    writeln!(out, "username={}", auth.username)?;
    writeln!(out, "password={}", auth.secret.expose_secret())?;
    out.flush()
}
