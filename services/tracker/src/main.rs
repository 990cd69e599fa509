use std::sync::Arc;

use anyhow::Result;
use common::database::DatabaseConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tracker::{
    AppState, config::AppConfig, database::Database, jwt::JwtService,
    password::Argon2PasswordEncoder, routes, seed,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting bug tracker");
    if config.uses_dev_secret() {
        warn!("TRACKER_JWT_SECRET not set; using the development secret");
    }

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let db = Database::connect(&db_config).await?;

    // Check database connectivity
    if db.health_check().await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let jwt = JwtService::new(&config.jwt_secret, config.session_ttl_seconds);
    let app_state = AppState::new(db, Arc::new(Argon2PasswordEncoder::new()), jwt);

    if config.seed_demo_data {
        seed::seed_demo_data(&app_state.users, &app_state.bugs).await?;
    }

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Bug tracker listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
