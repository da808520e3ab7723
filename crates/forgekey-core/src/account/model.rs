//! Account model types.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::server::ServerPath;

/// Unique identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Create a new account ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered credential identity tied to a server.
///
/// Two accounts are the same account when their ids are equal; name and
/// server are descriptive only. The secret token is never stored here, it is
/// handed out by the [`AccountDirectory`](super::AccountDirectory).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Display name for the account.
    pub name: String,
    /// Server this account authenticates against.
    pub server: ServerPath,
}

impl Account {
    /// Create an account.
    #[must_use]
    pub fn new(id: AccountId, name: impl Into<String>, server: ServerPath) -> Self {
        Self {
            id,
            name: name.into(),
            server,
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} (#{})", self.name, self.server, self.id)
    }
}

/// Caller scope used to pick a default account.
///
/// Typically the path of the repository a request originates from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerContext(String);

impl CallerContext {
    /// Create a context from its key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The context key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn server(s: &str) -> ServerPath {
        ServerPath::parse(s).unwrap()
    }

    mod account_id_tests {
        use super::*;

        #[test]
        fn display() {
            let id = AccountId::new(123);
            assert_eq!(format!("{id}"), "123");
        }

        #[test]
        fn ordering() {
            assert!(AccountId::new(1) < AccountId::new(2));
        }
    }

    mod account_tests {
        use super::*;

        #[test]
        fn equality_is_by_id() {
            let a = Account::new(AccountId::new(1), "work", server("github.com"));
            let renamed = Account::new(AccountId::new(1), "personal", server("ghe.corp"));
            let other = Account::new(AccountId::new(2), "work", server("github.com"));

            assert_eq!(a, renamed);
            assert_ne!(a, other);
        }

        #[test]
        fn set_deduplicates_by_id() {
            let a = Account::new(AccountId::new(1), "work", server("github.com"));
            let set: HashSet<Account> = [a.clone(), a.clone()].into_iter().collect();
            assert_eq!(set.len(), 1);
        }

        #[test]
        fn display_names_server_and_id() {
            let a = Account::new(AccountId::new(7), "work", server("github.com"));
            assert_eq!(a.to_string(), "work@github.com (#7)");
        }
    }

    #[test]
    fn caller_context_key() {
        let ctx = CallerContext::new("/home/me/project");
        assert_eq!(ctx.key(), "/home/me/project");
        assert_eq!(ctx.to_string(), "/home/me/project");
    }
}
