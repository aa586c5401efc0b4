//! egui front end for the diagnosis controller.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::api::DiagnosisApi;
use crate::diagnosis::DiagnosisController;

mod form_panel;
mod header;
mod result_panel;
mod status_bar;
pub mod style;
mod training_prompt;

/// Smallest window that still fits the form and result panels.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(640.0, 520.0);

const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// eframe application wrapping a [`DiagnosisController`].
pub struct DiagnosisApp {
    controller: DiagnosisController,
    base_url: String,
    visuals_set: bool,
}

impl DiagnosisApp {
    /// Create the app and kick off the initial status fetch.
    pub fn new(api: Arc<dyn DiagnosisApi>, base_url: impl Into<String>) -> Self {
        let mut controller = DiagnosisController::new(api);
        controller.refresh_status();
        Self {
            controller,
            base_url: base_url.into(),
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }
}

impl eframe::App for DiagnosisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();
        self.render_header(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |columns| {
                    self.render_form(&mut columns[0]);
                    self.render_result(&mut columns[1]);
                });
            });
        });
        self.render_training_prompt(ctx);
        if self.controller.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT_INTERVAL);
        }
    }
}
