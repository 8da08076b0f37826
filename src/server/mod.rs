// Dev server module
// Accept loop, connection handling and shutdown

pub mod connection;
pub mod listener;

pub use listener::create_listener;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept connections until Ctrl+C
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::spawn_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            result = &mut shutdown => {
                result?;
                logger::log_info("Ctrl+C received, shutting down");
                return Ok(());
            }
        }
    }
}
