//! Entry point for the egui diagnosis client.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::sync::Arc;

use eframe::egui;
use qdiag::api::ApiClient;
use qdiag::config;
use qdiag::logging::{self, ConsoleTarget};
use qdiag::ui::{DiagnosisApp, MIN_VIEWPORT_SIZE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init(ConsoleTarget::Stdout) {
        eprintln!("Logging disabled: {err}");
    }

    let config = config::load_or_default()?;
    let client = ApiClient::new(&config.api);
    tracing::info!(base_url = client.base_url(), "Starting diagnosis client");
    let base_url = client.base_url().to_string();
    let api = Arc::new(client);

    let viewport = egui::ViewportBuilder::default()
        .with_title("Quantum Diagnosis")
        .with_inner_size(egui::vec2(980.0, 680.0))
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Quantum Diagnosis",
        native_options,
        Box::new(move |_cc| Ok(Box::new(DiagnosisApp::new(api, base_url)))),
    )?;
    Ok(())
}
