use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, trace};

use crate::config::{initialize_app_state, AppConfig};
use crate::router::create_router;

#[instrument]
pub async fn serve(database_url: Option<String>, bind_address: Option<String>, migrate: bool) -> Result<()> {
    trace!("Entering serve function");
    info!("Warbler application starting up");

    let config = AppConfig::load()?.with_overrides(database_url, bind_address);
    debug!("Database URL: {}", config.database_url);
    debug!("Bind address: {}", config.bind_address);

    // Initialize application state
    trace!("Initializing application state");
    let state = match initialize_app_state(&config, migrate).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            return Err(e);
        }
    };

    // Create router
    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", config.bind_address);
    let listener = match TcpListener::bind(&config.bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", config.bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", config.bind_address, e);
            return Err(e.into());
        }
    };

    info!("Warbler running on http://{}", config.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
