#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config_manager;
mod debounce;
mod events;
mod gui;
mod languages;
mod ocr;
mod pipeline;
mod session;
mod state;
mod translate;

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gui::TranslatorGui;
use state::AppState;

fn main() -> Result<()> {
    // Config first: it carries the default log filter.
    let (config, loaded_from) = config_manager::load_or_default()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.system_config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &loaded_from {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file found; using defaults and LINGUA_* overrides"),
    }

    // Background work (debounce watcher, translation, OCR) runs here;
    // the GUI keeps the main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("lingua-worker")
        .build()?;

    let app_state = AppState::new(config, runtime.handle().clone())?;
    info!("Starting translator window");
    TranslatorGui::run(app_state)?;

    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}
