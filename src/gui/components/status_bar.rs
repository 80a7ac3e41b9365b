use egui::RichText;

use crate::gui::styles;

/// Severity of the line shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

pub struct StatusBar;

impl StatusBar {
    pub fn show(ui: &mut egui::Ui, message: &str, kind: StatusKind, on_clear: &mut bool) {
        if message.is_empty() {
            return;
        }

        ui.separator();
        ui.horizontal(|ui| {
            let color = match kind {
                StatusKind::Info => styles::TEXT_SECONDARY,
                StatusKind::Success => styles::SUCCESS_GREEN,
                StatusKind::Error => styles::ERROR_RED,
            };
            ui.label(RichText::new(message).size(13.0).color(color));
            if ui.button(RichText::new("Clear").size(12.0)).clicked() {
                *on_clear = true;
            }
        });
    }
}
