use eframe::egui::{self, Align2, RichText};

use super::DiagnosisApp;
use super::style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrainingPromptAction {
    None,
    Confirm,
    Cancel,
}

impl DiagnosisApp {
    /// Render the modal that confirms a training run.
    pub(super) fn render_training_prompt(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.confirm_training_open {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.cancel_training();
            return;
        }

        let palette = style::palette();
        let mut open = true;
        let mut action = TrainingPromptAction::None;
        egui::Window::new("Train model")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(
                        "Training replaces the current model and can take up to a minute.",
                    )
                    .color(palette.text),
                );
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("API key");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.controller.ui.api_key_input)
                            .password(true)
                            .hint_text("leave blank to use the configured key")
                            .desired_width(220.0),
                    );
                });
                ui.checkbox(&mut self.controller.ui.remember_api_key, "Remember this key");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Start training").clicked() {
                        action = TrainingPromptAction::Confirm;
                    }
                    if ui.button("Cancel").clicked() {
                        action = TrainingPromptAction::Cancel;
                    }
                });
            });

        match action {
            TrainingPromptAction::Confirm => self.controller.confirm_training(),
            TrainingPromptAction::Cancel => self.controller.cancel_training(),
            TrainingPromptAction::None if !open => self.controller.cancel_training(),
            TrainingPromptAction::None => {}
        }
    }
}
