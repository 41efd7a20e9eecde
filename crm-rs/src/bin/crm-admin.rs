//! Administration tool for the CRM
//!
//! # Usage
//!
//! ```bash
//! # Create the schema
//! crm-admin init-db --db sqlite://crm.db
//!
//! # Issue an API token for an owner
//! crm-admin token owner@example.com
//!
//! # Give an owner the starter templates
//! crm-admin seed-templates owner@example.com --db sqlite://crm.db
//! ```

use clap::{Parser, Subcommand};
use crm_rs::api::JwtConfig;
use crm_rs::config::Config;
use crm_rs::storage;
use crm_rs::templates::TemplateManager;
use sqlx::SqlitePool;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crm-admin")]
#[command(about = "Manage the outreach CRM database and API tokens", long_about = None)]
struct Cli {
    /// Config file (crm.toml is used when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL, overrides the config (e.g., sqlite://crm.db)
    #[arg(short, long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every table
    InitDb,
    /// Issue a JWT for an owner
    Token {
        /// Owner identifier (usually an email address)
        owner: String,
        /// Lifetime in hours, defaults to auth.token_hours
        #[arg(long)]
        hours: Option<u64>,
    },
    /// Insert the starter templates for an owner
    SeedTemplates {
        /// Owner identifier
        owner: String,
    },
}

/// Connect and create every table
async fn open_db(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = storage::connect(database_url).await?;
    storage::init_schema(&pool).await?;
    Ok(pool)
}

/// Sign a token with the configured secret
fn issue_token(config: &Config, owner: &str, hours: Option<u64>) -> anyhow::Result<String> {
    let jwt = JwtConfig::new(
        config.auth.jwt_secret.clone(),
        hours.unwrap_or(config.auth.token_hours),
    );
    Ok(jwt.create_token(owner)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage.database_url = db;
    }

    match cli.command {
        Commands::InitDb => {
            open_db(&config.storage.database_url).await?;
            println!("✅ Schema ready in {}", config.storage.database_url);
        }
        Commands::Token { owner, hours } => {
            println!("{}", issue_token(&config, &owner, hours)?);
        }
        Commands::SeedTemplates { owner } => {
            let pool = open_db(&config.storage.database_url).await?;
            let templates = TemplateManager::new(pool)
                .create_default_templates(&owner)
                .await?;

            println!("✅ Created {} templates for {}", templates.len(), owner);
            for template in templates {
                println!("   {} [{}] {}", template.id, template.channel, template.name);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validates_with_configured_secret() {
        let mut config = Config::default();
        config.auth.jwt_secret = "admin-test-secret".to_string();

        let token = issue_token(&config, "owner@example.com", None).unwrap();
        let claims = JwtConfig::new("admin-test-secret".to_string(), 1)
            .validate_token(&token)
            .unwrap();

        assert_eq!(claims.sub, "owner@example.com");
        assert_eq!(claims.exp - claims.iat, config.auth.token_hours * 3600);
    }

    #[test]
    fn test_token_hours_override() {
        let config = Config::default();
        let token = issue_token(&config, "owner@example.com", Some(2)).unwrap();
        let claims = JwtConfig::new(config.auth.jwt_secret.clone(), 1)
            .validate_token(&token)
            .unwrap();

        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let config = Config::default();
        let token = issue_token(&config, "owner@example.com", None).unwrap();
        assert!(JwtConfig::new("another-secret".to_string(), 1)
            .validate_token(&token)
            .is_err());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["crm-admin", "token", "a@b.c", "--hours", "4"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Token { ref owner, hours: Some(4) } if owner == "a@b.c"
        ));

        let cli =
            Cli::try_parse_from(["crm-admin", "--db", "sqlite::memory:", "init-db"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(cli.command, Commands::InitDb));
    }

    #[tokio::test]
    async fn test_seed_templates_into_fresh_database() {
        let pool = open_db("sqlite::memory:").await.unwrap();
        let manager = TemplateManager::new(pool);

        let created = manager
            .create_default_templates("owner@example.com")
            .await
            .unwrap();
        let listed = manager.list_templates("owner@example.com").await.unwrap();

        assert_eq!(created.len(), 5);
        assert_eq!(listed.len(), 5);
    }
}
