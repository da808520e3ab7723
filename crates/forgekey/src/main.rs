//! `forgekey` - git credential helper for code-hosting accounts.
//!
//! Configure it with `git config --global credential.helper forgekey`; git
//! then runs `forgekey get` for every HTTPS remote and receives the token of
//! the account that applies to that remote.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod account;
mod cli;
mod helper;
mod settings;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use forgekey_core::{AccountRepository, KeyringTokenStore};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use helper::CredentialRequest;
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout belongs to the helper protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forgekey=warn,forgekey_core=warn,forgekey_api=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let context = cli.context()?;

    match cli.command {
        Command::Get => {
            let request = CredentialRequest::parse(io::stdin().lock())?;
            let repo = open_repository(&settings).await?;
            let auth = helper::resolve(&repo, &settings.api, &context, &request).await?;
            if let Some(auth) = auth {
                helper::write_auth(io::stdout().lock(), &auth)?;
            }
        }
        Command::Store | Command::Erase => {
            let request = CredentialRequest::parse(io::stdin().lock())?;
            debug!("Ignoring store/erase request for {:?}", request.url());
        }
        Command::Account(command) => {
            let repo = open_repository(&settings).await?;
            account::run(
                &repo,
                &context,
                command,
                io::stdin().lock(),
                io::stdout().lock(),
            )
            .await?;
        }
    }

    Ok(())
}

/// Open the account database, creating its directory if needed.
async fn open_repository(settings: &Settings) -> Result<AccountRepository> {
    let db_path = settings.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let repo = AccountRepository::new(&db_path.to_string_lossy(), Arc::new(KeyringTokenStore))
        .await
        .with_context(|| format!("Failed to open account database {}", db_path.display()))?;
    info!("Using account database {}", db_path.display());
    Ok(repo)
}
