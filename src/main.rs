//! Service entry point

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use animal_registry::config::{RegistryConfig, StoreBackend};
use animal_registry::state::AppState;
use animal_registry::store::{AnimalStore, MemoryStore, RedisStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RegistryConfig::load()?;

    tokio::fs::create_dir_all(&config.uploads.directory)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.uploads.directory.display()
            )
        })?;

    let store: Arc<dyn AnimalStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Redis => {
            let url = config.redis_url().context(
                "redis backend selected but no connection string; set store.redis_url or REDIS_URL",
            )?;
            Arc::new(RedisStore::connect(&url)?)
        }
    };

    tracing::info!(
        backend = ?config.store.backend,
        uploads = %config.uploads.directory.display(),
        "animal registry starting"
    );

    let addr = config.bind_addr();
    let state = AppState::new(config, store)?;
    let app = animal_registry::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
