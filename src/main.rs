use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Single thread: connections are served as local tasks on one accept loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(&cfg).map_err(|e| {
        format!("Serving root '{}' is not accessible: {e}", cfg.server.root)
    })?);

    // No retry and no fallback port
    let listener = server::create_listener(addr, cfg.server.backlog)
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    logger::log_server_start(&cfg.public_url());

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            server::signal::wait_for_shutdown(),
        ))
        .await;
    Ok(())
}
