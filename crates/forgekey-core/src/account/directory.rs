//! Read-only view of the known accounts.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;

use super::model::{Account, AccountId, CallerContext};

/// Enumerates accounts, their tokens and the per-context default account.
///
/// Lookups are total: a directory that cannot answer reports "nothing".
pub trait AccountDirectory: Send + Sync {
    /// All known accounts.
    fn accounts(&self) -> Vec<Account>;

    /// The preferred account for a caller context, if one is set.
    fn default_account(&self, context: &CallerContext) -> Option<Account>;

    /// The secret token of an account.
    fn token_for_account(&self, account: &Account) -> Option<SecretString>;
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for Arc<T> {
    fn accounts(&self) -> Vec<Account> {
        (**self).accounts()
    }

    fn default_account(&self, context: &CallerContext) -> Option<Account> {
        (**self).default_account(context)
    }

    fn token_for_account(&self, account: &Account) -> Option<SecretString> {
        (**self).token_for_account(account)
    }
}

/// In-memory snapshot of an account directory.
///
/// Produced by [`AccountRepository::load_directory`](super::AccountRepository::load_directory)
/// or assembled directly.
#[derive(Debug, Default)]
pub struct LoadedDirectory {
    accounts: Vec<Account>,
    defaults: HashMap<CallerContext, AccountId>,
    tokens: HashMap<AccountId, SecretString>,
}

impl LoadedDirectory {
    /// Create a directory holding the given accounts.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            ..Self::default()
        }
    }

    /// Set the default account of a context.
    #[must_use]
    pub fn with_default(mut self, context: CallerContext, account_id: AccountId) -> Self {
        self.defaults.insert(context, account_id);
        self
    }

    /// Attach a token to an account.
    #[must_use]
    pub fn with_token(mut self, account_id: AccountId, token: impl Into<SecretString>) -> Self {
        self.tokens.insert(account_id, token.into());
        self
    }
}

impl AccountDirectory for LoadedDirectory {
    fn accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }

    fn default_account(&self, context: &CallerContext) -> Option<Account> {
        let id = self.defaults.get(context)?;
        self.accounts
            .iter()
            .find(|account| account.id == *id)
            .cloned()
    }

    fn token_for_account(&self, account: &Account) -> Option<SecretString> {
        self.tokens.get(&account.id).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::account::ServerPath;

    fn account(id: i64) -> Account {
        Account::new(AccountId::new(id), format!("acct{id}"), ServerPath::github())
    }

    #[test]
    fn default_is_per_context() {
        let ctx = CallerContext::new("/repo/a");
        let dir = LoadedDirectory::new(vec![account(1), account(2)])
            .with_default(ctx.clone(), AccountId::new(2));

        assert_eq!(dir.default_account(&ctx).unwrap().id, AccountId::new(2));
        let other = CallerContext::new("/repo/b");
        assert!(dir.default_account(&other).is_none());
    }

    #[test]
    fn default_pointing_at_unknown_account_is_ignored() {
        let ctx = CallerContext::new("/repo");
        let dir =
            LoadedDirectory::new(vec![account(1)]).with_default(ctx.clone(), AccountId::new(9));
        assert!(dir.default_account(&ctx).is_none());
    }

    #[test]
    fn tokens_by_account() {
        let dir = LoadedDirectory::new(vec![account(1), account(2)])
            .with_token(AccountId::new(1), "t1".to_string());

        let token = dir.token_for_account(&account(1)).unwrap();
        assert_eq!(token.expose_secret(), "t1");
        assert!(dir.token_for_account(&account(2)).is_none());
    }

    #[test]
    fn arc_forwards() {
        let dir = Arc::new(LoadedDirectory::new(vec![account(1)]));
        assert_eq!(AccountDirectory::accounts(&dir).len(), 1);
    }
}
