use clap::Parser;
use crm_rs::api::{ApiServer, JwtConfig};
use crm_rs::config::Config;
use crm_rs::{generator, logging, storage};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "crm-rs", version)]
#[command(about = "Outreach CRM API server", long_about = None)]
struct Cli {
    /// Config file (crm.toml is used when present)
    #[arg(value_name = "CONFIG")]
    config_file: Option<PathBuf>,

    /// Config file, alternative to the positional argument
    #[arg(short, long, conflicts_with = "config_file")]
    config: Option<PathBuf>,
}

impl Cli {
    fn config_path(&self) -> Option<&Path> {
        self.config.as_deref().or(self.config_file.as_deref())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config_path())?;

    logging::init(&config.logging);

    info!("🚀 Starting crm-rs v{}", env!("CARGO_PKG_VERSION"));
    info!("  API listening on: {}", config.server.listen_addr);
    info!("  Database: {}", config.storage.database_url);

    let pool = storage::connect(&config.storage.database_url).await?;
    storage::init_schema(&pool).await?;

    let generator = generator::from_config(&config.generation)?;
    info!("✅ Draft generator ready: {}", generator.describe());

    let server = ApiServer::new(
        pool,
        generator,
        JwtConfig::new(config.auth.jwt_secret.clone(), config.auth.token_hours),
        config.server.listen_addr.clone(),
    );

    if let Err(e) = server.run().await {
        error!("API server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
