use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

mod config;
mod documents;
mod error;
mod http;
mod logger;
mod server;
mod storage;

/// Config file (without extension) used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Tokio runtime, thread count from `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr, cfg.server.backlog)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(server::AppState::new(cfg));
    if state.config.database.init_schema {
        state.store.ensure_schema().await?;
    }

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            server::run(listener, Arc::clone(&state), shutdown).await;

            let grace = Duration::from_secs(state.config.performance.write_timeout);
            let remaining = server::drain(&state, grace).await;
            if remaining > 0 {
                logger::log_warning(&format!(
                    "Shutting down with {remaining} connection(s) still open"
                ));
            }
        })
        .await;

    logger::log_info("Document intake service stopped");
    Ok(())
}
