use eframe::egui;
use poll_promise::Promise;
use std::sync::Arc;

use crate::auth::{AuthService, SessionManager};
use crate::config::Config;
use crate::icons;
use crate::modal::{ModalComponent, ModalStack};
use crate::Result;

use super::components::{
    AppToolbar, StatusBar, StatusKind, ToolbarAction, UserMenu, UserMenuAction,
};
use super::events::{TapEvent, TapRoute, TapTarget};
use super::lifecycle::Lifecycle;
use super::modal_layer;
use super::styles;

pub struct ToolbarApp {
    toolbar: AppToolbar,
    session: Arc<SessionManager>,
    modals: ModalStack,
    user_menu: UserMenu,
    menu_promise: Option<Promise<Result<()>>>,
    status_message: String,
    status_kind: StatusKind,
    scroll_to_top: bool,
}

impl ToolbarApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        session: Arc<SessionManager>,
    ) -> Result<Self> {
        styles::setup_custom_style(&cc.egui_ctx);
        egui_extras::install_image_loaders(&cc.egui_ctx);
        icons::register_defaults();

        let auth: Arc<dyn AuthService> = session.clone();
        let mut toolbar = AppToolbar::new(config.toolbar.clone(), auth, &config.logo_path);
        toolbar.start()?;

        Ok(Self {
            toolbar,
            session,
            modals: ModalStack::new().with_repaint(cc.egui_ctx.clone()),
            user_menu: UserMenu::default(),
            menu_promise: None,
            status_message: String::new(),
            status_kind: StatusKind::Info,
            scroll_to_top: false,
        })
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_kind = kind;
        self.status_message = message.into();
    }

    fn handle_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::OpenUserMenu => self.handle_menu_tap(),
            ToolbarAction::Search => {
                self.dispatch_simple_tap(TapTarget::Search, "Search is not available yet")
            }
            ToolbarAction::Notifications => {
                self.dispatch_simple_tap(TapTarget::Notifications, "No new notifications")
            }
            ToolbarAction::HeaderTapped => self.dispatch_simple_tap(TapTarget::Header, ""),
        }
    }

    fn handle_menu_tap(&mut self) {
        if self.menu_promise.is_some() {
            log::debug!("User menu is already opening; ignoring tap");
            return;
        }

        let mut event = TapEvent::new(TapTarget::UserMenuTrigger);
        let mut pending = None;
        let mut header_tapped = false;
        {
            let toolbar = &self.toolbar;
            let modals = &self.modals;
            TapRoute::new()
                .on(TapTarget::UserMenuTrigger, |event| {
                    pending = Some(toolbar.open_user_menu(event, modals.clone()));
                })
                .on(TapTarget::Header, |_| header_tapped = true)
                .dispatch(&mut event);
        }

        if header_tapped {
            self.scroll_to_top = true;
        }
        if let Some(future) = pending {
            self.menu_promise = Some(Promise::spawn_async(future));
        }
    }

    /// Taps on plain controls bubble up to the header, which scrolls the
    /// page back to the top.
    fn dispatch_simple_tap(&mut self, target: TapTarget, message: &str) {
        let mut event = TapEvent::new(target);
        let mut header_tapped = false;
        TapRoute::new()
            .on(target, |_| {})
            .on(TapTarget::Header, |_| header_tapped = true)
            .dispatch(&mut event);

        if header_tapped {
            self.scroll_to_top = true;
        }
        if !message.is_empty() {
            self.set_status(StatusKind::Info, message);
        }
    }

    fn poll_menu_promise(&mut self) {
        let Some(promise) = &self.menu_promise else {
            return;
        };
        let Some(result) = promise.ready() else {
            return;
        };

        let failure = result.as_ref().err().map(|e| e.to_string());
        self.menu_promise = None;
        if let Some(e) = failure {
            log::error!("Failed to open user menu: {}", e);
            self.set_status(StatusKind::Error, format!("Failed to open user menu: {}", e));
        }
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        let mut outcome = None;
        modal_layer::show_modals(ctx, &self.modals, |ui, entry| match entry.options.component {
            ModalComponent::UserMenu => match self.user_menu.ui(ui, &self.session) {
                Some(action) => {
                    outcome = Some(action);
                    true
                }
                None => false,
            },
        });

        match outcome {
            Some(UserMenuAction::LoggedIn(user)) => {
                self.set_status(StatusKind::Success, format!("Signed in as {}", user));
            }
            Some(UserMenuAction::LoggedOut) => self.set_status(StatusKind::Success, "Signed out"),
            Some(UserMenuAction::Failed(message)) => {
                log::error!("{}", message);
                self.set_status(StatusKind::Error, message);
            }
            Some(UserMenuAction::Close) | None => {}
        }
    }
}

impl eframe::App for ToolbarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(e) = self.session.expire_if_due() {
            log::warn!("Session expiry check failed: {}", e);
        }
        self.toolbar.sync_auth();
        self.poll_menu_promise();
        self.toolbar.forget_closed_menu(|id| self.modals.is_open(id));

        let mut action = None;
        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                action = self.toolbar.show(ui);
            });
        if let Some(action) = action {
            self.handle_action(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut scroll = egui::ScrollArea::vertical();
            if std::mem::take(&mut self.scroll_to_top) {
                scroll = scroll.vertical_scroll_offset(0.0);
            }
            scroll.show(ui, |ui| {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    let greeting = match self.session.current() {
                        Ok(session) => format!("Welcome back, {}", session.user_name),
                        Err(_) => "Sign in from the menu to see your offers".to_string(),
                    };
                    ui.label(egui::RichText::new(greeting).size(16.0));
                });
            });

            let mut clear = false;
            StatusBar::show(ui, &self.status_message, self.status_kind, &mut clear);
            if clear {
                self.status_message.clear();
            }
        });

        self.show_modals(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.toolbar.stop();
        self.modals.close();
    }
}
