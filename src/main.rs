use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod app_state;
mod config;
mod db;
mod error;
mod middleware;
mod modules;
mod scheduling;
mod services_cache;

use app_state::AppState;
use services_cache::ServicesCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let env = config::init().context("Failed to load configuration")?.clone();
    info!(
        "Starting {} in {:?} mode",
        env.app.name, env.app.environment
    );

    let db = db::init_pool()
        .await
        .context("Failed to initialize the database pool")?;

    // Warm the services read model once; admin mutations keep it fresh.
    let services = ServicesCache::default();
    services
        .reload(&db)
        .await
        .context("Failed to load services into the cache")?;
    info!("Loaded {} services into the cache", services.current().len());

    let addr = env.server_addr();
    let app = app::create_router(AppState::new(db, env, services));

    info!("{} listening on {}", env!("CARGO_PKG_NAME"), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
