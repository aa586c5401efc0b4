use eframe::egui::{self, RichText};

use crate::diagnosis::features::{MAX_AGE, MIN_AGE};
use crate::diagnosis::{FormField, Preset, RiskFlag, Sex};

use super::DiagnosisApp;
use super::style;

impl DiagnosisApp {
    /// Render the patient feature form with its presets and actions.
    pub(super) fn render_form(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Patient features").strong().color(palette.accent));
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Presets:").color(palette.text_dim));
            for preset in [Preset::LowRisk, Preset::HighRisk] {
                if ui.button(preset.label()).clicked() {
                    self.controller.apply_preset(preset);
                }
            }
        });
        ui.add_space(8.0);

        let mut age = self.controller.ui.form.values.age;
        ui.horizontal(|ui| {
            ui.label("Age");
            let response = ui.add(egui::DragValue::new(&mut age).range(0..=150).speed(0.25));
            response.on_hover_text(format!("Between {MIN_AGE} and {MAX_AGE}"));
        });
        if age != self.controller.ui.form.values.age {
            self.controller.set_age(age);
        }
        self.render_field_error(ui, FormField::Age);

        let mut sex = self.controller.ui.form.values.sex;
        ui.horizontal(|ui| {
            ui.label("Sex");
            egui::ComboBox::from_id_salt("sex_select")
                .selected_text(sex.map(Sex::label).unwrap_or("Select..."))
                .show_ui(ui, |ui| {
                    for option in Sex::ALL {
                        ui.selectable_value(&mut sex, Some(option), option.label());
                    }
                });
        });
        if sex != self.controller.ui.form.values.sex {
            self.controller.set_sex(sex);
        }
        self.render_field_error(ui, FormField::Sex);

        ui.add_space(6.0);
        for flag in RiskFlag::ALL {
            let mut checked = self.controller.ui.form.values.flag(flag);
            if ui
                .checkbox(&mut checked, flag.label())
                .on_hover_text(flag.description())
                .changed()
            {
                self.controller.set_flag(flag, checked);
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let predicting = self.controller.ui.predicting;
            let label = if predicting { "Predicting..." } else { "Predict" };
            let enabled = !predicting && self.controller.can_predict();
            let response = ui.add_enabled(enabled, egui::Button::new(label));
            if response.clicked() {
                self.controller.submit_prediction();
            }
            if !self.controller.can_predict() {
                response.on_disabled_hover_text("Train the model first to enable prediction");
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_form();
            }
            if predicting {
                ui.add(egui::Spinner::new());
            }
        });
    }

    fn render_field_error(&self, ui: &mut egui::Ui, field: FormField) {
        if let Some(message) = self.controller.ui.form.errors.get(field) {
            ui.label(RichText::new(message).small().color(style::palette().alert));
        }
    }
}
