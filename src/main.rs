use std::path::PathBuf;

use eframe::egui;
use job_market_dashboard::app::DashboardApp;
use job_market_dashboard::state::AppState;

/// Environment variable naming the postings file when no argument is given.
const DATA_ENV: &str = "JOB_MARKET_DATA";
const DEFAULT_DATA: &str = "./india_job_market_dataset.csv";

fn dataset_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(DATA_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA))
}

fn main() -> eframe::Result {
    env_logger::init();

    let path = dataset_path();
    let mut state = AppState::default();
    // A failed load leaves the dashboard on its error screen.
    if state.open(&path).is_err() {
        log::warn!("Starting without data; use File → Open… to pick a dataset");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Indian Job Market Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}
