use std::time::Duration;

use tracing_subscriber::EnvFilter;

use vidrec_api::api::{create_router, AppState};
use vidrec_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let state = AppState::in_memory(Duration::from_millis(config.recommend_deadline_ms));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Recommendation server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
