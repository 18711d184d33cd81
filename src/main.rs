use std::sync::Arc;

use sunspec_bridge::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let options = Options::new();

    sunspec_bridge::init_logging();

    let config = match ConfigWrapper::new(options.config_file.clone()) {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to load config: {:#}", err);
            std::process::exit(255);
        }
    };
    sunspec_bridge::set_loglevel(&config.loglevel());

    // Create a channel for shutdown signaling
    let (shutdown_tx, _) = broadcast::channel(1);

    // Handle Ctrl+C
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        if let Err(e) = shutdown_tx_clone.send(()) {
            error!("Failed to send shutdown signal: {}", e);
        }
    });

    // Run the application
    let app_handle = tokio::spawn(sunspec_bridge::app(
        shutdown_tx.subscribe(),
        Arc::new(config),
        options,
    ));

    if let Err(e) = app_handle.await? {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
