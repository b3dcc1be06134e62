mod config;
mod error;
mod routes;
mod storage;

use std::sync::Arc;

use config::AppConfig;
use routes::{app_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);
    init_tracing(config.environment.is_production())?;
    tracing::info!("Starting tally-api with config: {:?}", config);

    let state = AppState::from_config(config);
    let bind_addr = state.config.bind_addr;
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("tally-api listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::from_default_env().add_directive("tally_api=info".parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
