use egui::{Color32, Rounding, Stroke, Style, Visuals};

pub fn setup_custom_style(ctx: &egui::Context) {
    let mut style = Style {
        visuals: Visuals::dark(),
        ..Default::default()
    };

    style.visuals.window_fill = Color32::from_rgb(20, 24, 30);
    style.visuals.panel_fill = Color32::from_rgb(24, 28, 34);
    style.visuals.faint_bg_color = Color32::from_rgb(30, 34, 40);
    style.visuals.extreme_bg_color = Color32::from_rgb(14, 16, 20);
    style.visuals.override_text_color = Some(Color32::from_rgb(240, 240, 240));

    style.visuals.widgets.inactive.bg_fill = Color32::from_rgb(46, 52, 60);
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 200, 200));
    style.visuals.widgets.inactive.rounding = Rounding::same(6.0);

    style.visuals.widgets.hovered.bg_fill = Color32::from_rgb(60, 68, 78);
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    style.visuals.widgets.hovered.rounding = Rounding::same(6.0);

    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    style.visuals.widgets.active.rounding = Rounding::same(6.0);

    style.visuals.selection.bg_fill = ACCENT;
    style.visuals.selection.stroke = Stroke::new(1.5, ACCENT);

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);

    ctx.set_style(style);
}

// Tawfir green palette
pub const ACCENT: Color32 = Color32::from_rgb(46, 125, 50);
pub const TOOLBAR_BG: Color32 = Color32::from_rgb(27, 94, 32);
pub const BACKDROP: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 140);
pub const SUCCESS_GREEN: Color32 = Color32::from_rgb(129, 199, 132);
pub const ERROR_RED: Color32 = Color32::from_rgb(244, 67, 54);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 166, 176);
