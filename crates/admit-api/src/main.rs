//! Admissions schedule API server (development backend).

use admit_api::server::{self, AppState};
use admit_store::{InMemoryScheduleStore, Seed};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(InMemoryScheduleStore::new());
    if let Ok(path) = std::env::var("ADMIT_SEED_PATH") {
        tracing::info!(path = %path, "seeding store");
        Seed::from_path(&path).await?.apply(&store).await?;
    }

    let app = server::router(Arc::new(AppState::new(store)));
    let addr: SocketAddr = std::env::var("ADMIT_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    tracing::info!("admissions API listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
