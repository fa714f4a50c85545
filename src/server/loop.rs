// Server loop module
// Accepts connections until shutdown, then drains in-flight requests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::ShutdownSignal;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` fires.
///
/// After shutdown the listener is closed at once. Open connections finish
/// their in-flight request and close; they get up to `drain_timeout` to do
/// so before the loop returns.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<ShutdownSignal>,
    drain_timeout: Duration,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &shutdown);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.wait() => break,
        }
    }

    drop(listener);
    let remaining = drain_connections(&active_connections, drain_timeout).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}

/// Wait for the connection counter to reach zero or the deadline to pass.
/// Returns the number of connections still open.
async fn drain_connections(active_connections: &AtomicUsize, drain_timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + drain_timeout;

    loop {
        let open = active_connections.load(Ordering::SeqCst);
        if open == 0 {
            return 0;
        }

        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {
                return active_connections.load(Ordering::SeqCst);
            }
        }
    }
}
