use eframe::egui::{self, RichText};

use crate::api::{PredictionResult, RiskLevel, format_probability};

use super::DiagnosisApp;
use super::style;

impl DiagnosisApp {
    pub(super) fn render_result(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Diagnosis").strong().color(palette.accent));
        ui.add_space(4.0);
        let Some(result) = self.controller.ui.prediction.clone() else {
            ui.label(
                RichText::new("No prediction yet. Fill in the form and press Predict.")
                    .color(palette.text_dim),
            );
            return;
        };
        render_summary(ui, &result);
        ui.add_space(8.0);
        render_feature_importance(ui, &result);
        ui.add_space(8.0);
        ui.checkbox(&mut self.controller.ui.show_raw_json, "Show raw JSON");
        if self.controller.ui.show_raw_json {
            let raw = serde_json::to_string_pretty(&result).unwrap_or_else(|err| err.to_string());
            egui::Frame::new()
                .fill(palette.canvas)
                .stroke(style::inner_border())
                .inner_margin(egui::Margin::same(6))
                .show(ui, |ui| {
                    ui.monospace(raw);
                });
        }
    }
}

fn render_summary(ui: &mut egui::Ui, result: &PredictionResult) {
    let palette = style::palette();
    let level = result.risk_level();
    let level_text = match level {
        RiskLevel::Low => "Low risk",
        RiskLevel::High => "High risk",
    };
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(&result.diagnosis)
                .strong()
                .size(16.0)
                .color(style::risk_color(level)),
        );
        ui.label(RichText::new(format!("({level_text})")).color(palette.text_dim));
    });
    probability_row(ui, "Final", result.final_probability, style::risk_color(level));
    probability_row(ui, "Classical AI", result.ai_probability, palette.accent);
    probability_row(
        ui,
        "Quantum refined",
        result.quantum_refined_probability,
        palette.quantum,
    );
    let quantum = if result.used_quantum {
        "Quantum refinement applied"
    } else {
        "Quantum refinement not applied"
    };
    ui.label(RichText::new(quantum).small().color(palette.text_dim));
}

fn probability_row(ui: &mut egui::Ui, label: &str, value: f64, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add_sized([120.0, 18.0], egui::Label::new(label));
        ui.add(
            egui::ProgressBar::new(value.clamp(0.0, 1.0) as f32)
                .desired_width(220.0)
                .fill(color)
                .text(format_probability(value)),
        );
    });
}

fn render_feature_importance(ui: &mut egui::Ui, result: &PredictionResult) {
    let palette = style::palette();
    let ranked = result.ranked_features();
    if ranked.is_empty() {
        return;
    }
    ui.label(RichText::new("Feature importance").color(palette.text_dim));
    let max = ranked
        .first()
        .map(|feature| feature.weight.abs())
        .filter(|max| *max > 0.0)
        .unwrap_or(1.0);
    for feature in ranked {
        ui.horizontal(|ui| {
            ui.add_sized([160.0, 18.0], egui::Label::new(feature.display_name()));
            ui.add(
                egui::ProgressBar::new((feature.weight.abs() / max) as f32)
                    .desired_width(180.0)
                    .fill(style::weight_color(feature.weight))
                    .text(format!("{:+.3}", feature.weight)),
            );
        });
    }
}
