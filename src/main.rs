use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod handler;
mod http;
mod logger;
mod page;
mod routing;
mod server;
mod template;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    // Templates are validated before anything binds: a wiki with a broken
    // template set must never accept a connection.
    let state = match config::AppState::from_config(cfg.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            logger::log_error(&format!("Failed to load templates: {e}"));
            return Err(e.into());
        }
    };

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, state))
}

async fn async_main(
    cfg: config::Config,
    state: Arc<config::AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = match server::create_reusable_listener(addr) {
        Ok(listener) => listener,
        Err(e) => {
            logger::log_error(&format!("Failed to bind {addr}: {e}"));
            return Err(e.into());
        }
    };

    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(server::ShutdownSignal::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    server::run_server_loop(
        listener,
        state,
        Arc::new(AtomicUsize::new(0)),
        shutdown,
        Duration::from_secs(cfg.server.shutdown_timeout),
    )
    .await?;
    Ok(())
}
