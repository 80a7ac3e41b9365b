use egui::{Align, Layout, RichText};

use crate::auth::SessionManager;
use crate::gui::styles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMenuAction {
    Close,
    LoggedIn(String),
    LoggedOut,
    Failed(String),
}

/// Content of the user-menu modal: a sign-in form when logged out, the
/// account name and a sign-out button otherwise.
#[derive(Default)]
pub struct UserMenu {
    user_name_input: String,
}

impl UserMenu {
    pub fn ui(&mut self, ui: &mut egui::Ui, session: &SessionManager) -> Option<UserMenuAction> {
        let mut action = None;

        ui.with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(8.0);

            match session.current() {
                Ok(current) => {
                    ui.label(RichText::new("Signed in as").color(styles::TEXT_SECONDARY));
                    ui.heading(RichText::new(&current.user_name).size(18.0).strong());
                    ui.label(
                        RichText::new(format!(
                            "Session valid until {}",
                            current.expires_at.format("%Y-%m-%d %H:%M")
                        ))
                        .size(12.0)
                        .color(styles::TEXT_SECONDARY),
                    );
                    ui.add_space(12.0);

                    if ui.button(RichText::new("Sign out").size(15.0)).clicked() {
                        action = Some(match session.logout() {
                            Ok(()) => UserMenuAction::LoggedOut,
                            Err(e) => UserMenuAction::Failed(format!("Sign out failed: {}", e)),
                        });
                    }
                }
                Err(_) => {
                    ui.heading(RichText::new("Sign in").size(18.0).strong());
                    ui.add_space(8.0);

                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.user_name_input)
                            .hint_text("User name")
                            .desired_width(220.0),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    ui.add_space(12.0);
                    let enabled = !self.user_name_input.trim().is_empty();
                    let clicked = ui
                        .add_enabled(enabled, egui::Button::new(RichText::new("Sign in").size(15.0)))
                        .clicked();

                    if enabled && (clicked || submitted) {
                        action = Some(match session.login(&self.user_name_input) {
                            Ok(current) => {
                                self.user_name_input.clear();
                                UserMenuAction::LoggedIn(current.user_name)
                            }
                            Err(e) => UserMenuAction::Failed(format!("Sign in failed: {}", e)),
                        });
                    }
                }
            }

            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                action = Some(UserMenuAction::Close);
            }
        });

        action
    }
}
