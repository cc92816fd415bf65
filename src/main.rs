use std::process::ExitCode;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod registry;
mod server;

use config::{AppState, Config};
use error::ServerError;
use registry::TenantRegistry;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    let cfg = Config::load()?;
    logger::init(&cfg).map_err(ServerError::Logger)?;
    let registry = cfg.build_registry()?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|w| *w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(ServerError::Runtime)?;

    runtime.block_on(async_main(cfg, registry))
}

async fn async_main(cfg: Config, registry: TenantRegistry) -> Result<(), ServerError> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg, &registry);

    let state = Arc::new(AppState::new(&cfg, registry));
    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
