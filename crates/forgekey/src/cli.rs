//! Command-line interface definition.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forgekey_core::{CallerContext, ServerPath};

/// Picks the right code-hosting account for each git remote.
#[derive(Debug, Parser)]
#[command(name = "forgekey", version, about)]
pub struct Cli {
    /// Caller context used to pick a default account [default: enclosing git
    /// worktree, or the current directory outside one]
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The caller context.
    ///
    /// Without `--context` this is the top level of the worktree containing
    /// the current directory, which is where git runs credential helpers
    /// from. Outside a worktree the current directory is used as is.
    pub fn context(&self) -> Result<CallerContext> {
        if let Some(key) = &self.context {
            return Ok(CallerContext::new(key.clone()));
        }
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Ok(CallerContext::new(worktree_root(&cwd).to_string_lossy()))
    }
}

/// The nearest ancestor of `dir` (itself included) holding a `.git` entry.
///
/// `.git` may be a file for linked worktrees and submodules.
fn worktree_root(dir: &Path) -> PathBuf {
    dir.ancestors()
        .find(|candidate| candidate.join(".git").exists())
        .unwrap_or(dir)
        .to_path_buf()
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Credential helper: print the credential for the request on stdin
    Get,
    /// Credential helper: accepted and ignored
    Store,
    /// Credential helper: accepted and ignored
    Erase,
    /// Manage stored accounts
    #[command(subcommand)]
    Account(AccountCommand),
}

/// Account management commands.
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Register an account; the token is read from stdin
    Add {
        /// Server, e.g. `github.com` or `https://ghe.example.com:8443`
        server: ServerPath,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// List accounts
    List,
    /// Remove an account and its token
    Remove {
        /// Account id as shown by `account list`
        id: i64,
    },
    /// Show, set or clear the default account of the context
    Default {
        /// Account id to make the default
        id: Option<i64>,
        /// Clear the default instead
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
}
