//! Account storage repository.

use std::sync::Arc;

use secrecy::SecretString;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use super::credentials::TokenStore;
use super::directory::LoadedDirectory;
use super::model::{Account, AccountId, CallerContext};
use super::server::ServerPath;
use crate::{Error, Result};

/// Repository for account storage and retrieval.
///
/// Account rows live in `SQLite`; tokens go to the injected [`TokenStore`].
pub struct AccountRepository {
    pool: SqlitePool,
    tokens: Arc<dyn TokenStore>,
}

impl AccountRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool, tokens };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory(tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool, tokens };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                server TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS default_accounts (
                context TEXT PRIMARY KEY,
                account_id INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a stored server is invalid.
    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query("SELECT id, name, server FROM accounts ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_account).collect()
    }

    /// Get account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored server is invalid.
    pub async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT id, name, server FROM accounts WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    /// Register a new account and store its token.
    ///
    /// The row is only committed once the token is stored, so a failed
    /// token write leaves no account behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the insert fails, or the token
    /// cannot be stored.
    pub async fn add(
        &self,
        name: &str,
        server: &ServerPath,
        token: &SecretString,
    ) -> Result<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("INSERT INTO accounts (name, server) VALUES (?, ?)")
            .bind(name)
            .bind(server.to_string())
            .execute(&mut *tx)
            .await?;

        let account = Account::new(
            AccountId::new(result.last_insert_rowid()),
            name,
            server.clone(),
        );
        // Dropping `tx` on error rolls the insert back
        self.tokens.store_token(account.id, token)?;
        tx.commit().await?;

        debug!("Added account {account}");
        Ok(account)
    }

    /// Delete an account.
    ///
    /// Also clears any default pointing at it and removes its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the database query fails.
    pub async fn remove(&self, id: AccountId) -> Result<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::AccountNotFound(id.to_string()));
        }

        sqlx::query("DELETE FROM default_accounts WHERE account_id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if let Err(e) = self.tokens.delete_token(id) {
            warn!("Failed to delete token for account {id}: {e}");
        }

        Ok(())
    }

    /// Make an account the default for a caller context.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the database query fails.
    pub async fn set_default(&self, context: &CallerContext, id: AccountId) -> Result<()> {
        if self.get(id).await?.is_none() {
            return Err(Error::AccountNotFound(id.to_string()));
        }

        sqlx::query(
            r"
            INSERT INTO default_accounts (context, account_id) VALUES (?, ?)
            ON CONFLICT(context) DO UPDATE SET account_id = excluded.account_id
            ",
        )
        .bind(context.key())
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        debug!("Default account for {context} is now {id}");
        Ok(())
    }

    /// Remove the default account of a caller context.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clear_default(&self, context: &CallerContext) -> Result<()> {
        sqlx::query("DELETE FROM default_accounts WHERE context = ?")
            .bind(context.key())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get the default account of a caller context.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_default(&self, context: &CallerContext) -> Result<Option<Account>> {
        let row = sqlx::query(
            r"
            SELECT a.id, a.name, a.server
            FROM default_accounts d
            JOIN accounts a ON a.id = d.account_id
            WHERE d.context = ?
            ",
        )
        .bind(context.key())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    /// Snapshot accounts, defaults and tokens into a [`LoadedDirectory`].
    ///
    /// A token that cannot be read from the token store is logged and left
    /// out, so that account resolves to no credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_directory(&self) -> Result<LoadedDirectory> {
        let accounts = self.list().await?;

        let rows = sqlx::query("SELECT context, account_id FROM default_accounts")
            .fetch_all(&self.pool)
            .await?;

        let mut directory = LoadedDirectory::new(accounts.clone());
        for row in &rows {
            let context = CallerContext::new(row.get::<String, _>("context"));
            let account_id = AccountId::new(row.get("account_id"));
            directory = directory.with_default(context, account_id);
        }

        for account in &accounts {
            match self.tokens.get_token(account.id) {
                Ok(Some(token)) => directory = directory.with_token(account.id, token),
                Ok(None) => debug!("No token stored for account {account}"),
                Err(e) => warn!("Failed to load token for account {account}: {e}"),
            }
        }

        Ok(directory)
    }
}

/// Convert a database row to an Account.
fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
    let server: String = row.get("server");
    Ok(Account {
        id: AccountId::new(row.get("id")),
        name: row.get("name"),
        server: ServerPath::parse(&server)?,
    })
}
