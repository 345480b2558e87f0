use std::sync::Arc;

use frontdesk_api::config::{FrontdeskConfig, StoreKind};
use frontdesk_api::router;
use frontdesk_api::state::AppState;
use frontdesk_storage::client;
use frontdesk_storage::memory::MemoryStore;
use frontdesk_storage::s3::S3Store;
use frontdesk_storage::store::DocumentStore;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = FrontdeskConfig::from_env()?;
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        store = ?config.store,
        timezone = config.timezone.iana_name().unwrap_or("fixed"),
        "frontdesk api listening"
    );

    match config.store {
        StoreKind::Memory => {
            tracing::warn!("using the in-memory store; data is lost on restart");
            serve(listener, MemoryStore::new(), &config).await
        }
        StoreKind::S3 => {
            let s3 = match &config.region {
                Some(region) => client::build_client_with_region(region).await,
                None => client::build_client().await,
            };
            let store = S3Store::new(s3, config.bucket.clone(), config.poll_interval);
            serve(listener, store, &config).await
        }
    }
}

async fn serve<S: DocumentStore>(
    listener: TcpListener,
    store: S,
    config: &FrontdeskConfig,
) -> eyre::Result<()> {
    let state = AppState::new(Arc::new(store), config.timezone.clone());
    axum::serve(listener, router(state)).await?;
    Ok(())
}
