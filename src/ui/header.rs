use eframe::egui::{self, Frame, Margin, RichText};

use super::DiagnosisApp;
use super::style;

impl DiagnosisApp {
    pub(super) fn render_header(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("header")
            .frame(
                Frame::new()
                    .fill(palette.canvas)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Quantum-Enhanced Medical Diagnosis")
                            .strong()
                            .size(18.0)
                            .color(palette.accent),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.render_model_controls(ui);
                    });
                });
            });
    }

    fn render_model_controls(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let training = self.controller.ui.training;
        let train_label = if training { "Training..." } else { "Train model" };
        if ui
            .add_enabled(!training, egui::Button::new(train_label))
            .on_hover_text("Retrain the backend model. Requires an API key.")
            .clicked()
        {
            self.controller.request_training();
        }
        let loading = self.controller.ui.status_loading;
        if ui
            .add_enabled(!loading && !training, egui::Button::new("Refresh"))
            .on_disabled_hover_text("Status refreshes on its own when training ends.")
            .clicked()
        {
            self.controller.refresh_status();
        }
        if loading || training {
            ui.add(egui::Spinner::new());
        }
        let (text, color) = match &self.controller.ui.model_status {
            Some(status) if status.trained => (status.summary(), palette.healthy),
            Some(status) => (status.summary(), palette.caution),
            None if loading => ("Checking...".to_string(), palette.text_dim),
            None => ("Status unknown".to_string(), palette.text_dim),
        };
        ui.label(RichText::new(text).color(color));
        ui.label(RichText::new("Model:").color(palette.text_dim));
    }
}
