//! CLI command definitions and dispatch.

pub mod migrate;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gabb_auth::keys::{KeyProvider, build_key_provider};
use gabb_auth::revocation::PostgresRevocationStore;
use gabb_auth::{Authorizer, JwtDecoder, SystemClock};
use gabb_core::config::AppConfig;
use gabb_core::error::AppError;
use gabb_database::connection::DatabasePool;
use gabb_storage::manager::StorageManager;

use crate::output::OutputFormat;

/// Gabb token and database administration
#[derive(Debug, Parser)]
#[command(name = "gabb", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (`config/{env}.toml` over `config/default.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Issue, inspect, and revoke tokens
    Token(token::TokenArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        match &self.command {
            Commands::Token(args) => token::execute(args, &config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
        }
    }
}

/// Helper: key provider over the configured object store
pub async fn load_keys(config: &AppConfig) -> Result<Arc<dyn KeyProvider>, AppError> {
    let storage = StorageManager::from_config(&config.storage).await?;
    Ok(build_key_provider(&config.auth, storage.default_store()?))
}

/// Helper: connect to the configured database
pub async fn connect_db(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: authorizer backed by the database revocation list
pub async fn build_authorizer(config: &AppConfig) -> Result<Authorizer, AppError> {
    let keys = load_keys(config).await?;
    let db = connect_db(config).await?;
    let decoder = JwtDecoder::new(keys, Arc::new(SystemClock));
    Ok(Authorizer::new(decoder, Arc::new(PostgresRevocationStore::new(db.tokens()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use token::{IssueKind, TokenCommand};

    #[test]
    fn test_parse_issue_purpose() {
        let cli = Cli::try_parse_from([
            "gabb",
            "--format",
            "json",
            "token",
            "issue",
            "purpose",
            "reset-password",
            "p1",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.env, "development");
        let Commands::Token(args) = cli.command else {
            panic!("expected token command");
        };
        let TokenCommand::Issue { kind } = args.command else {
            panic!("expected issue");
        };
        assert_eq!(
            kind,
            IssueKind::Purpose {
                purpose: "reset-password".into(),
                id: "p1".into()
            }
        );
    }

    #[test]
    fn test_parse_revoke_requires_token() {
        assert!(Cli::try_parse_from(["gabb", "token", "revoke"]).is_err());
        assert!(Cli::try_parse_from(["gabb", "token", "revoke", "abc", "--yes"]).is_ok());
    }
}
