//! Server endpoint descriptors and URL matching.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Host name of the public GitHub service.
const GITHUB_HOST: &str = "github.com";

/// API root of the public GitHub service.
const GITHUB_API_URL: &str = "https://api.github.com";

/// API path appended to self-hosted servers.
const ENTERPRISE_API_PATH: &str = "/api/v3";

/// URL scheme of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Scheme {
    /// Scheme name as used in URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Server an account authenticates against.
///
/// The string form is `[scheme://]host[:port][/suffix]`, e.g.
/// `github.com` or `https://git.example.com:8443/forge`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerPath {
    scheme: Option<Scheme>,
    host: String,
    port: Option<u16>,
    suffix: Option<String>,
}

impl ServerPath {
    /// Server descriptor for public GitHub.
    #[must_use]
    pub fn github() -> Self {
        Self {
            scheme: Some(Scheme::Https),
            host: GITHUB_HOST.to_string(),
            port: None,
            suffix: None,
        }
    }

    /// Parse a server descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidServer`] if the host is missing or malformed,
    /// the port is not a number, or the path contains query characters.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || Error::InvalidServer(input.to_string());

        let lower = trimmed.to_ascii_lowercase();
        let (scheme, rest) = if lower.starts_with("https://") {
            (Some(Scheme::Https), &trimmed["https://".len()..])
        } else if lower.starts_with("http://") {
            (Some(Scheme::Http), &trimmed["http://".len()..])
        } else if lower.contains("://") {
            return Err(invalid());
        } else {
            (None, trimmed)
        };

        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let (authority, path) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| invalid())?;
                (host, Some(port))
            }
            None => (authority, None),
        };
        if host.is_empty() || host.contains(['?', '#', '@']) {
            return Err(invalid());
        }

        let suffix = if path.is_empty() {
            None
        } else {
            let well_formed = path
                .split('/')
                .skip(1)
                .all(|segment| !segment.is_empty() && !segment.contains(['?', '#']));
            if !well_formed {
                return Err(invalid());
            }
            Some(path.to_string())
        };

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            suffix,
        })
    }

    /// Host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, if any.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path prefix below the host, if any (starts with `/`).
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Whether this is the public GitHub service.
    #[must_use]
    pub fn is_github_dot_com(&self) -> bool {
        self.host.eq_ignore_ascii_case(GITHUB_HOST)
    }

    /// Whether a remote URL points at this server.
    ///
    /// Scheme, credentials and port of the URL are ignored; the remaining
    /// `host/path` must start with this server's host and suffix
    /// (case-insensitively) and continue with `/` or end there.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let location = remove_port(&remove_protocol_prefix(url));
        let expected = format!("{}{}", self.host, self.suffix.as_deref().unwrap_or(""));

        let Some(prefix) = location.get(..expected.len()) else {
            return false;
        };
        if !prefix.eq_ignore_ascii_case(&expected) {
            return false;
        }
        matches!(location.as_bytes().get(expected.len()), None | Some(b'/'))
    }

    /// Web URL of the server.
    #[must_use]
    pub fn to_url(&self) -> String {
        let scheme = self.scheme.unwrap_or_default();
        let mut url = format!("{}://{}", scheme.as_str(), self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        if let Some(suffix) = &self.suffix {
            url.push_str(suffix);
        }
        url
    }

    /// REST API root of the server.
    #[must_use]
    pub fn api_url(&self) -> String {
        if self.is_github_dot_com() {
            GITHUB_API_URL.to_string()
        } else {
            format!("{}{ENTERPRISE_API_PATH}", self.to_url())
        }
    }
}

impl std::fmt::Display for ServerPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(scheme) = self.scheme {
            write!(f, "{}://", scheme.as_str())?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ServerPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ServerPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ServerPath> for String {
    fn from(server: ServerPath) -> Self {
        server.to_string()
    }
}

/// Strip scheme and user info from a remote URL.
///
/// `scheme://[user@]host/path` keeps `host/path`; scp-like
/// `user@host:path` becomes `host/path`.
fn remove_protocol_prefix(url: &str) -> String {
    if let Some(i) = url.find("://") {
        let rest = &url[i + 3..];
        let authority_end = rest.find('/').unwrap_or(rest.len());
        return match rest[..authority_end].rfind('@') {
            Some(at) => rest[at + 1..].to_string(),
            None => rest.to_string(),
        };
    }
    match url.find('@') {
        Some(at) => url[at + 1..].replacen(':', "/", 1),
        None => url.to_string(),
    }
}

/// Drop a numeric `:port` that directly follows the host.
fn remove_port(location: &str) -> String {
    let (authority, rest) = match location.find('/') {
        Some(i) => location.split_at(i),
        None => (location, ""),
    };
    match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{host}{rest}")
        }
        _ => location.to_string(),
    }
}
