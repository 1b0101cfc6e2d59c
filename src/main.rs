//! Run the SMS relay as a long-lived Axum server.

use sms_relay::{logging, AppConfig};
use sms_web_axum::{router, AppState, NETLIFY_PATH, SEND_PATH};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    logging::init(&config.logging)?;

    if config.twilio.credentials().is_none() {
        warn!("twilio is not configured; sends will be answered with 500");
    }

    let app = router(
        AppState::new(config.processor()),
        config.server.max_body_size,
    );

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(
        addr = %listener.local_addr()?,
        mode = ?config.relay.response_mode,
        "sms relay listening on {} and {}",
        SEND_PATH,
        NETLIFY_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
