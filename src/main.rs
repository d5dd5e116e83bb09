mod app;
mod callbacks;
mod color;
mod config;
mod data;
mod figure;
mod layout;
mod reactive;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use app::SpacexDashApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;

    // The table is loaded before the window opens; any failure here is fatal.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    dataset
        .validate_sites(&config.site_values())
        .context("launch site not offered by the dropdown")?;
    log::info!(
        "Loaded {} launches, payload {} - {} kg, sites {:?}",
        dataset.len(),
        dataset.min_payload(),
        dataset.max_payload(),
        dataset.sites
    );

    let state = AppState::new(Arc::new(dataset), &config).context("wiring callbacks")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Ok(Box::new(SpacexDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI terminated with an error: {e}"))
}
