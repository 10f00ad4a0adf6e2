use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod handler;
mod http;
mod i18n;
mod logger;
mod server;

const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = parse_config_path(std::env::args().skip(1))?;
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sizing workers from configuration
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

/// Read `-c <path>` / `--config <path>` from the command line
fn parse_config_path(mut args: impl Iterator<Item = String>) -> Result<String, String> {
    let mut path = DEFAULT_CONFIG_PATH.to_string();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                path = args
                    .next()
                    .ok_or_else(|| format!("{arg} requires a file path"))?;
            }
            other => {
                if let Some(value) = other.strip_prefix("--config=") {
                    path = value.to_string();
                } else {
                    return Err(format!(
                        "Unknown argument '{other}'. Usage: i18n-login [-c|--config <path>]"
                    ));
                }
            }
        }
    }
    Ok(path)
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr, cfg.server.backlog)?;

    let users = i18n::UserTable::builtin();
    if users.is_empty() {
        logger::log_warning("No mock users loaded; every request will be anonymous");
    }
    let catalog = i18n::Catalog;
    for locale in &cfg.i18n.supported_locales {
        if !catalog.has_locale(locale) {
            logger::log_warning(&format!(
                "Locale '{locale}' has no translations; pages will use the source messages"
            ));
        }
    }

    logger::log_server_start(&addr, &cfg, users.len());

    let grace = Duration::from_secs(cfg.performance.write_timeout);
    let state = Arc::new(config::AppState::new(&cfg, users));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            active_connections,
            signals,
            grace,
        ))
        .await;

    logger::log_info("Server stopped");
    Ok(())
}
