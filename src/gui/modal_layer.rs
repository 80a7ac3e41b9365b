use egui::{Align2, Id, Margin, Order, Rounding, Sense};

use super::styles;
use crate::modal::{ModalEntry, ModalStack, USER_MENU_CLASS};

/// Frame layout selected by a modal's style class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ModalStyle {
    pub min_width: f32,
    pub inner_margin: f32,
    pub rounding: f32,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            min_width: 200.0,
            inner_margin: 16.0,
            rounding: 8.0,
        }
    }
}

impl ModalStyle {
    pub fn for_class(class: &str) -> Self {
        match class {
            USER_MENU_CLASS => Self {
                min_width: 280.0,
                inner_margin: 20.0,
                rounding: 12.0,
            },
            _ => Self::default(),
        }
    }
}

/// Draws every presented modal above the app, topmost last.
///
/// `content` renders a modal's body and returns `true` when it wants the
/// modal dismissed.
pub(super) fn show_modals(
    ctx: &egui::Context,
    stack: &ModalStack,
    mut content: impl FnMut(&mut egui::Ui, &ModalEntry) -> bool,
) {
    for entry in stack.presented() {
        if entry.options.show_backdrop {
            let screen = ctx.screen_rect();
            egui::Area::new(Id::new(("modal-backdrop", entry.id)))
                .order(Order::Foreground)
                .fixed_pos(screen.min)
                .show(ctx, |ui| {
                    let response = ui.allocate_rect(screen, Sense::click());
                    ui.painter().rect_filled(screen, 0.0, styles::BACKDROP);
                    if response.clicked() {
                        stack.backdrop_tapped(entry.id);
                    }
                });
        }

        let style = ModalStyle::for_class(&entry.options.style_class);
        let mut dismiss = false;
        egui::Area::new(Id::new((entry.options.style_class.as_str(), entry.id)))
            .order(Order::Tooltip)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .inner_margin(Margin::same(style.inner_margin))
                    .rounding(Rounding::same(style.rounding))
                    .show(ui, |ui| {
                        ui.set_min_width(style.min_width);
                        dismiss = content(ui, &entry);
                    });
            });

        if dismiss {
            stack.dismiss(entry.id);
        }
    }
}
