//! Fee ledger API server binary

use fee_ledger_api::{run_server, ApiConfig};
use fee_ledger_core_rs::StaticDirectory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = ApiConfig::from_env();

    let directory = match &config.seed_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let directory = StaticDirectory::from_json(&json)?;
            tracing::info!(schools = directory.school_count(), seed = %path.display(), "directory loaded");
            directory
        }
        None => {
            tracing::warn!("no seed file configured; starting with an empty directory");
            StaticDirectory::new()
        }
    };

    run_server(&config, directory).await
}
