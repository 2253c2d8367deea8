// Server module entry
// Listener setup, the accept loop and per-connection serving

pub mod connection;
pub mod listener;
pub mod router;
pub mod signal;
pub mod state;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub use listener::create_listener;
pub use state::AppState;

use crate::logger;

/// Accept connections until `shutdown` is notified.
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = shutdown.notified() => {
                logger::log_info("[Server] Listener closed");
                break;
            }
        }
    }
}

/// Wait for in-flight connections to finish, at most `grace`.
///
/// Returns the number of connections still open when the wait ended.
pub async fn drain(state: &AppState, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Config::load_from("does-not-exist/docintake").unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let state = test_state();
        assert_eq!(drain(&state, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_after_grace() {
        let state = test_state();
        state.active_connections.store(2, Ordering::SeqCst);
        assert_eq!(drain(&state, Duration::from_millis(200)).await, 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        let shutdown = Arc::new(Notify::new());
        shutdown.notify_one();

        let local = tokio::task::LocalSet::new();
        local.run_until(run(listener, test_state(), shutdown)).await;
    }
}
