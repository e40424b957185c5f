use nocache_server::{config, logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Tokio runtime, worker count from config (defaults to CPU cores)
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(config::AppState::from_current_dir(cfg)?);
    let addr = config::bind_addr();
    let listener = server::create_listener(addr)?;

    println!("Serving on port {}...", addr.port());
    logger::log_server_start(&addr, &state);

    server::serve(listener, state).await;
    Ok(())
}
