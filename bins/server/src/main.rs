//! budgetcast API server
//!
//! Main entry point for the budget forecasting service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetcast_api::{AppState, create_router};
use budgetcast_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetcast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    info!(
        seasonality_period = config.forecast.seasonality_period,
        alpha = %config.forecast.alpha,
        beta = %config.forecast.beta,
        gamma = %config.forecast.gamma,
        "Forecast defaults loaded"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
