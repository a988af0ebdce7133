use std::sync::Arc;

use portal::api::router;
use portal::config::AppConfig;
use portal::gateway::{DataGateway, GatewayConfig, SupabaseHttpClient, UnconfiguredGateway};
use portal::services::DraftSweeper;
use portal::state::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "portal=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway: Arc<dyn DataGateway> = match GatewayConfig::new_from_env() {
        Ok(gateway_config) => {
            info!("Using data API at {}", gateway_config.url);
            Arc::new(SupabaseHttpClient::new(gateway_config)?)
        }
        Err(e) => {
            warn!("{}; data API calls will fail", e);
            Arc::new(UnconfiguredGateway)
        }
    };

    let sweeper = DraftSweeper::new(
        pool.clone(),
        config.draft_ttl_secs,
        config.draft_sweep_interval_secs,
    );
    tokio::spawn(sweeper.start());

    let state = AppState {
        db: pool.clone(),
        gateway,
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
