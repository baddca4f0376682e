//! Lapboard - A state-managed HTTP server for multi-stopwatch elapsed-time
//! tracking
//!
//! This is the main entry point for the lapboard application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use lapboard::{api::create_router, config::Config, state::AppState, utils::shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("lapboard={},tower_http=info", config.log_level()))
        .init();

    info!("Starting lapboard server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms",
        config.host, config.port, config.tick_ms
    );

    // Create application state with a single-stopwatch bank
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_period(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /watches               - Add a stopwatch");
    info!("  DELETE /watches/last          - Remove the last stopwatch");
    info!("  POST   /watches/:index/start  - Start or resume a stopwatch");
    info!("  POST   /watches/:index/pause  - Pause a stopwatch");
    info!("  POST   /watches/:index/reset  - Reset a stopwatch");
    info!("  POST   /watches/start-all     - Toggle all between running and paused");
    info!("  POST   /watches/reset-all     - Reset all stopwatches");
    info!("  GET    /status                - Bank snapshot and server status");
    info!("  GET    /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
