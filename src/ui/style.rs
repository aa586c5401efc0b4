use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::api::RiskLevel;
use crate::diagnosis::StatusTone;

const WIDGET_RADIUS: u8 = 3;

/// Slate surfaces with a teal accent; risk colours stay readable on all of them.
#[derive(Clone, Copy)]
pub struct Palette {
    pub canvas: Color32,
    pub surface: Color32,
    pub control: Color32,
    pub outline: Color32,
    pub divider: Color32,
    pub text: Color32,
    pub text_dim: Color32,
    pub accent: Color32,
    pub quantum: Color32,
    /// Feature weights that lower the risk estimate.
    pub protective: Color32,
    /// Feature weights that raise it.
    pub aggravating: Color32,
    pub caution: Color32,
    pub healthy: Color32,
    pub alert: Color32,
}

pub fn palette() -> Palette {
    Palette {
        canvas: Color32::from_rgb(15, 22, 28),
        surface: Color32::from_rgb(22, 31, 39),
        control: Color32::from_rgb(34, 46, 56),
        outline: Color32::from_rgb(48, 63, 75),
        divider: Color32::from_rgb(28, 38, 47),
        text: Color32::from_rgb(214, 222, 228),
        text_dim: Color32::from_rgb(138, 153, 165),
        accent: Color32::from_rgb(72, 170, 196),
        quantum: Color32::from_rgb(160, 132, 220),
        protective: Color32::from_rgb(96, 190, 160),
        aggravating: Color32::from_rgb(232, 150, 92),
        caution: Color32::from_rgb(228, 184, 76),
        healthy: Color32::from_rgb(88, 186, 120),
        alert: Color32::from_rgb(226, 84, 96),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let p = palette();
    *visuals = Visuals::dark();
    visuals.override_text_color = Some(p.text);
    visuals.window_fill = p.surface;
    visuals.panel_fill = p.canvas;
    visuals.extreme_bg_color = p.canvas;
    visuals.faint_bg_color = p.divider;
    visuals.hyperlink_color = p.accent;
    visuals.error_fg_color = p.alert;
    visuals.warn_fg_color = p.caution;
    visuals.selection.bg_fill = p.accent.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, p.accent);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = p.surface;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, p.divider);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, p.text);
    paint_widget(&mut widgets.inactive, p.control, p.outline, p.text);
    paint_widget(&mut widgets.hovered, p.outline, p.accent, p.text);
    paint_widget(&mut widgets.active, p.accent.gamma_multiply(0.6), p.accent, p.text);
    paint_widget(&mut widgets.open, p.control, p.accent, p.text);

    visuals.window_corner_radius = CornerRadius::same(6);
    visuals.menu_corner_radius = CornerRadius::same(WIDGET_RADIUS);
    visuals.window_stroke = Stroke::new(1.0, p.outline);
    visuals.popup_shadow = Shadow::NONE;
}

fn paint_widget(vis: &mut WidgetVisuals, fill: Color32, border: Color32, text: Color32) {
    vis.corner_radius = CornerRadius::same(WIDGET_RADIUS);
    vis.bg_fill = fill;
    vis.weak_bg_fill = fill;
    vis.bg_stroke = Stroke::new(1.0, border);
    vis.fg_stroke = Stroke::new(1.0, text);
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().outline)
}

pub fn inner_border() -> Stroke {
    Stroke::new(1.0, palette().divider)
}

/// Badge colour and label for the status bar.
pub fn status_badge(tone: StatusTone) -> (&'static str, Color32) {
    let p = palette();
    match tone {
        StatusTone::Idle => ("Idle", p.control),
        StatusTone::Busy => ("Working", p.accent),
        StatusTone::Info => ("Info", p.healthy),
        StatusTone::Warning => ("Warning", p.caution),
        StatusTone::Error => ("Error", p.alert),
    }
}

pub fn risk_color(level: RiskLevel) -> Color32 {
    match level {
        RiskLevel::Low => palette().healthy,
        RiskLevel::High => palette().alert,
    }
}

/// Positive weights push toward the diagnosis, negative ones away from it.
pub fn weight_color(weight: f64) -> Color32 {
    if weight >= 0.0 {
        palette().aggravating
    } else {
        palette().protective
    }
}
