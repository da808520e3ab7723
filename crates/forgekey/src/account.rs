//! Account management commands.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use forgekey_core::{AccountId, AccountRepository, CallerContext};
use secrecy::SecretString;

use crate::cli::AccountCommand;

/// Run an account command, reading a token from `input` when needed.
pub async fn run<R: BufRead, W: Write>(
    repo: &AccountRepository,
    context: &CallerContext,
    command: AccountCommand,
    mut input: R,
    mut out: W,
) -> Result<()> {
    match command {
        AccountCommand::Add { server, name } => {
            let mut line = String::new();
            input.read_line(&mut line)?;
            let token = line.trim();
            if token.is_empty() {
                bail!("No token given on stdin");
            }
            let account = repo
                .add(&name, &server, &SecretString::from(token.to_string()))
                .await?;
            writeln!(out, "Added account {account}")?;
        }
        AccountCommand::List => {
            let default = repo.get_default(context).await?;
            for account in repo.list().await? {
                let marker = if default.as_ref() == Some(&account) {
                    " (default)"
                } else {
                    ""
                };
                writeln!(
                    out,
                    "{}\t{}\t{}{marker}",
                    account.id, account.name, account.server
                )?;
            }
        }
        AccountCommand::Remove { id } => {
            repo.remove(AccountId::new(id)).await?;
            writeln!(out, "Removed account {id}")?;
        }
        AccountCommand::Default { clear: true, .. } => {
            repo.clear_default(context).await?;
            writeln!(out, "Cleared default account for {context}")?;
        }
        AccountCommand::Default { id: Some(id), .. } => {
            repo.set_default(context, AccountId::new(id)).await?;
            writeln!(out, "Default account for {context} is now {id}")?;
        }
        AccountCommand::Default { id: None, .. } => match repo.get_default(context).await? {
            Some(account) => writeln!(out, "{account}")?,
            None => writeln!(out, "No default account for {context}")?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use forgekey_core::{MemoryTokenStore, ServerPath, TokenStore};
    use secrecy::ExposeSecret;

    use super::*;

    async fn exec(
        repo: &AccountRepository,
        command: AccountCommand,
        input: &str,
    ) -> Result<String> {
        let context = CallerContext::new("/repo");
        let mut out = Vec::new();
        run(repo, &context, command, input.as_bytes(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    async fn repo() -> AccountRepository {
        AccountRepository::in_memory(Arc::new(MemoryTokenStore::new()))
            .await
            .unwrap()
    }

    fn add(server: &str, name: &str) -> AccountCommand {
        AccountCommand::Add {
            server: ServerPath::parse(server).unwrap(),
            name: name.to_string(),
        }
    }

    const fn default(id: Option<i64>, clear: bool) -> AccountCommand {
        AccountCommand::Default { id, clear }
    }

    #[tokio::test]
    async fn add_list_default_remove() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let repo = AccountRepository::in_memory(tokens.clone()).await.unwrap();

        let output = exec(&repo, add("github.com", "work"), "ghp_token\n")
            .await
            .unwrap();
        assert_eq!(output, "Added account work@github.com (#1)\n");
        let token = tokens.get_token(AccountId::new(1)).unwrap().unwrap();
        assert_eq!(token.expose_secret(), "ghp_token");

        exec(&repo, default(Some(1), false), "").await.unwrap();
        let listing = exec(&repo, AccountCommand::List, "").await.unwrap();
        assert_eq!(listing, "1\twork\tgithub.com (default)\n");

        let shown = exec(&repo, default(None, false), "").await.unwrap();
        assert_eq!(shown, "work@github.com (#1)\n");

        exec(&repo, AccountCommand::Remove { id: 1 }, "").await.unwrap();
        assert_eq!(exec(&repo, AccountCommand::List, "").await.unwrap(), "");
    }

    #[tokio::test]
    async fn add_requires_token() {
        let repo = repo().await;
        assert!(exec(&repo, add("github.com", "work"), "\n").await.is_err());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_default() {
        let repo = repo().await;
        exec(&repo, add("github.com", "work"), "t\n").await.unwrap();
        exec(&repo, default(Some(1), false), "").await.unwrap();

        let output = exec(&repo, default(None, true), "").await.unwrap();
        assert_eq!(output, "Cleared default account for /repo\n");
        let context = CallerContext::new("/repo");
        assert!(repo.get_default(&context).await.unwrap().is_none());
    }
}
