use egui::{RichText, SizeHint, Vec2};

pub const PLACEHOLDER_LOGO: &str = "assets/images/logo-placeholder.svg";

const LOGO_SIZE: f32 = 32.0;

/// Toolbar logo that swaps to a bundled placeholder when its source fails to
/// load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    src: String,
}

impl LogoImage {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn uri(&self) -> String {
        format!("file://{}", self.src)
    }

    pub fn is_placeholder(&self) -> bool {
        self.src == PLACEHOLDER_LOGO
    }

    pub fn on_load_error(&mut self) {
        self.src = PLACEHOLDER_LOGO.to_string();
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let uri = self.uri();
        match ui.ctx().try_load_image(&uri, SizeHint::default()) {
            Ok(_) => {
                ui.add(egui::Image::new(uri).fit_to_exact_size(Vec2::splat(LOGO_SIZE)));
            }
            Err(e) => {
                if !self.is_placeholder() {
                    log::debug!("Logo {} failed to load ({}); using placeholder", self.src, e);
                }
                self.on_load_error();
                ui.label(RichText::new("◎").size(LOGO_SIZE * 0.8));
            }
        }
    }
}
