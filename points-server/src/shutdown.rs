//! Signal handling for graceful shutdown and config reload.

use crate::config::ConfigLoader;
use points_core::config::{ConfigStore, PointsRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that reloads the registry on SIGHUP.
///
/// A file that fails to load or validate leaves the running registry in
/// place. The listen address and price feed settings are only read at
/// startup. Returns a Notify that stops the task.
pub fn spawn_config_reload_handler(
    registry: ConfigStore<PointsRegistry>,
    config_loader: Arc<ConfigLoader>,
    listen: SocketAddr,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    match config_loader.reload() {
                        Ok(loaded_config) => {
                            if loaded_config.listen != listen {
                                tracing::warn!(
                                    "Listen address changed to {}, restart to apply",
                                    loaded_config.listen
                                );
                            }
                            registry.replace(loaded_config.registry).await;
                            tracing::info!(
                                version = registry.version(),
                                "Configuration reloaded successfully"
                            );
                        }
                        Err(e) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                        }
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Config reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}
