use egui::{Color32, Rect, RichText};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex};

use super::logo::LogoImage;
use crate::auth::{AuthService, AuthSignal, Subscription};
use crate::gui::events::TapEvent;
use crate::gui::lifecycle::{Lifecycle, Liveness, Phase};
use crate::gui::styles;
use crate::icons;
use crate::modal::{
    ModalComponent, ModalController, ModalHandle, ModalId, ModalOptions, USER_MENU_CLASS,
};
use crate::{Error, Result};

pub const DEFAULT_TITLE: &str = "تطبيق توفير";

/// Inputs supplied by the hosting view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarOptions {
    pub title: String,
    pub show_search: bool,
    pub show_notifications: bool,
    pub show_menu: bool,
    pub transparent: bool,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            show_search: true,
            show_notifications: false,
            show_menu: true,
            transparent: false,
        }
    }
}

impl ToolbarOptions {
    pub fn affordances(&self) -> Affordances {
        Affordances {
            search: self.show_search,
            notifications: self.show_notifications,
            menu: self.show_menu,
        }
    }
}

/// Which optional controls the toolbar renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub search: bool,
    pub notifications: bool,
    pub menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    HeaderTapped,
    Search,
    Notifications,
    OpenUserMenu,
}

pub struct AppToolbar {
    options: ToolbarOptions,
    auth: Arc<dyn AuthService>,
    subscription: Option<Subscription>,
    is_logged_in: bool,
    phase: Phase,
    liveness: Liveness,
    logo: LogoImage,
    open_menu: Arc<Mutex<Option<ModalId>>>,
    controls: Vec<(ToolbarAction, Rect)>,
}

impl AppToolbar {
    pub fn new(options: ToolbarOptions, auth: Arc<dyn AuthService>, logo_src: &str) -> Self {
        Self {
            options,
            auth,
            subscription: None,
            is_logged_in: false,
            phase: Phase::Uninitialized,
            liveness: Liveness::default(),
            logo: LogoImage::new(logo_src),
            open_menu: Arc::new(Mutex::new(None)),
            controls: Vec::new(),
        }
    }

    pub fn options(&self) -> &ToolbarOptions {
        &self.options
    }

    pub fn affordances(&self) -> Affordances {
        self.options.affordances()
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn logo(&self) -> &LogoImage {
        &self.logo
    }

    pub fn logo_mut(&mut self) -> &mut LogoImage {
        &mut self.logo
    }

    /// Controls drawn by the last `show`, with their screen rects.
    pub fn controls(&self) -> &[(ToolbarAction, Rect)] {
        &self.controls
    }

    /// Modal presented by the last completed open, while it is still up.
    pub fn open_menu(&self) -> Option<ModalId> {
        self.open_menu.lock().ok().and_then(|slot| *slot)
    }

    /// Clears the open-menu marker once `is_open` reports the modal gone.
    pub fn forget_closed_menu(&self, is_open: impl Fn(ModalId) -> bool) {
        if let Ok(mut slot) = self.open_menu.lock() {
            if slot.is_some_and(|id| !is_open(id)) {
                *slot = None;
            }
        }
    }

    /// Applies the newest auth emission, if one arrived since the last call.
    pub fn sync_auth(&mut self) {
        let Some(subscription) = self.subscription.as_mut() else {
            return;
        };

        match subscription.poll() {
            Some(AuthSignal::Status(logged_in)) => {
                self.is_logged_in = logged_in.unwrap_or(false);
            }
            Some(AuthSignal::Failed(reason)) => {
                log::warn!(
                    "Auth-status stream failed: {}. Keeping logged_in = {}",
                    reason,
                    self.is_logged_in
                );
            }
            None => {}
        }
    }

    pub fn user_menu_options() -> ModalOptions {
        ModalOptions {
            component: ModalComponent::UserMenu,
            style_class: USER_MENU_CLASS.to_string(),
            can_dismiss: true,
            show_backdrop: true,
            backdrop_dismiss: true,
        }
    }

    /// Stops `event` from reaching enclosing regions and returns the
    /// create-then-present sequence for the user menu.
    ///
    /// The sequence may outlive the toolbar. It still presents the modal in
    /// that case but leaves the toolbar's state alone.
    pub fn open_user_menu<M>(
        &self,
        event: &mut TapEvent,
        modals: M,
    ) -> impl Future<Output = Result<()>> + Send + 'static
    where
        M: ModalController + Send + Sync + 'static,
    {
        event.stop_propagation();

        let token = self.liveness.token();
        let open_menu = Arc::clone(&self.open_menu);

        async move {
            let modal = modals.create(Self::user_menu_options()).await?;
            if !token.is_alive() {
                log::debug!("Toolbar stopped while {} was being created", modal.id());
            }

            modal.present().await?;
            if !token.is_alive() {
                log::debug!("Toolbar stopped before {} was presented", modal.id());
                return Ok(());
            }

            if let Ok(mut slot) = open_menu.lock() {
                *slot = Some(modal.id());
            }
            Ok(())
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<ToolbarAction> {
        let mut action = None;
        let affordances = self.affordances();
        self.controls.clear();

        let fill = if self.options.transparent {
            Color32::TRANSPARENT
        } else {
            styles::TOOLBAR_BG
        };

        let frame = egui::Frame::none()
            .fill(fill)
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.logo.show(ui);
                    ui.add_space(8.0);
                    ui.heading(
                        RichText::new(&self.options.title)
                            .size(20.0)
                            .strong()
                            .color(Color32::WHITE),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if affordances.menu {
                            let glyph = icons::lookup(icons::MENU).unwrap_or("≡");
                            let trigger = ui
                                .button(RichText::new(glyph).size(18.0).color(
                                    if self.is_logged_in {
                                        styles::SUCCESS_GREEN
                                    } else {
                                        Color32::WHITE
                                    },
                                ))
                                .on_hover_text(if self.is_logged_in {
                                    "Account"
                                } else {
                                    "Sign in"
                                });
                            self.controls.push((ToolbarAction::OpenUserMenu, trigger.rect));
                            if trigger.clicked() {
                                action = Some(ToolbarAction::OpenUserMenu);
                            }
                        }

                        if affordances.notifications {
                            let bell = ui.button(RichText::new("🔔").size(16.0));
                            self.controls.push((ToolbarAction::Notifications, bell.rect));
                            if bell.clicked() {
                                action = Some(ToolbarAction::Notifications);
                            }
                        }

                        if affordances.search {
                            let search = ui.button(RichText::new("🔍").size(16.0));
                            self.controls.push((ToolbarAction::Search, search.rect));
                            if search.clicked() {
                                action = Some(ToolbarAction::Search);
                            }
                        }
                    });
                });
            });

        // Clicks on the bare bar, outside any control and not on a layer
        // drawn above it.
        let rect = frame.response.rect;
        let click_pos = ui.input(|i| {
            i.pointer
                .primary_clicked()
                .then(|| i.pointer.interact_pos())
                .flatten()
        });
        let bar_clicked = click_pos.is_some_and(|pos| {
            rect.contains(pos)
                && ui
                    .ctx()
                    .layer_id_at(pos)
                    .map_or(true, |top| top == ui.layer_id())
        });
        if action.is_none() && bar_clicked {
            action = Some(ToolbarAction::HeaderTapped);
        }

        action
    }
}

impl Lifecycle for AppToolbar {
    fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            return Err(Error::Lifecycle(format!(
                "Toolbar cannot start from {:?}",
                self.phase
            )));
        }

        self.subscription = Some(self.auth.is_logged_in());
        self.phase = Phase::Active;
        log::debug!("Toolbar started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.liveness.revoke();
        if self.phase != Phase::Destroyed {
            log::debug!("Toolbar stopped");
        }
        self.phase = Phase::Destroyed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthStatusChannel;

    fn screen() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))
    }

    /// One frame with the toolbar in a top panel, optionally under a
    /// full-screen foreground layer.
    fn render(
        ctx: &egui::Context,
        toolbar: &mut AppToolbar,
        events: Vec<egui::Event>,
        covered: bool,
    ) -> (Option<ToolbarAction>, egui::FullOutput) {
        let input = egui::RawInput {
            screen_rect: Some(screen()),
            events,
            ..Default::default()
        };
        let mut action = None;
        let output = ctx.run(input, |ctx| {
            egui::TopBottomPanel::top("toolbar")
                .frame(egui::Frame::none())
                .show(ctx, |ui| {
                    action = toolbar.show(ui);
                });
            if covered {
                egui::Area::new(egui::Id::new("cover"))
                    .order(egui::Order::Foreground)
                    .fixed_pos(egui::Pos2::ZERO)
                    .show(ctx, |ui| {
                        let _ = ui.allocate_rect(screen(), egui::Sense::click());
                    });
            }
        });
        (action, output)
    }

    fn warm_up(
        ctx: &egui::Context,
        toolbar: &mut AppToolbar,
    ) -> (Option<ToolbarAction>, egui::FullOutput) {
        render(ctx, toolbar, Vec::new(), false);
        render(ctx, toolbar, Vec::new(), false)
    }

    /// Moves the pointer to `pos`, presses and releases; returns every action
    /// reported along the way.
    fn click(
        ctx: &egui::Context,
        toolbar: &mut AppToolbar,
        pos: egui::Pos2,
        covered: bool,
    ) -> Vec<ToolbarAction> {
        let button = |pressed| egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };
        let mut actions = Vec::new();
        for events in [
            vec![egui::Event::PointerMoved(pos)],
            vec![button(true)],
            vec![button(false)],
            vec![egui::Event::PointerGone],
        ] {
            actions.extend(render(ctx, toolbar, events, covered).0);
        }
        actions
    }

    fn drawn_controls(toolbar: &AppToolbar) -> Vec<ToolbarAction> {
        toolbar.controls().iter().map(|(action, _)| *action).collect()
    }

    fn any_shape(shapes: &[egui::epaint::ClippedShape], found: &dyn Fn(&egui::Shape) -> bool) -> bool {
        fn walk(shape: &egui::Shape, found: &dyn Fn(&egui::Shape) -> bool) -> bool {
            match shape {
                egui::Shape::Vec(inner) => inner.iter().any(|s| walk(s, found)),
                other => found(other),
            }
        }
        shapes.iter().any(|clipped| walk(&clipped.shape, found))
    }

    fn has_fill(shapes: &[egui::epaint::ClippedShape], color: Color32) -> bool {
        any_shape(shapes, &|shape| matches!(shape, egui::Shape::Rect(rect) if rect.fill == color))
    }

    fn has_text(shapes: &[egui::epaint::ClippedShape], text: &str) -> bool {
        any_shape(shapes, &|shape| matches!(shape, egui::Shape::Text(t) if t.galley.text() == text))
    }

    fn toolbar(channel: &AuthStatusChannel) -> AppToolbar {
        AppToolbar::new(
            ToolbarOptions::default(),
            Arc::new(channel.clone()),
            "assets/images/logo.png",
        )
    }

    #[test]
    fn test_default_options() {
        let options = ToolbarOptions::default();
        assert_eq!(options.title, "تطبيق توفير");
        assert!(!options.transparent);
        assert_eq!(
            options.affordances(),
            Affordances {
                search: true,
                notifications: false,
                menu: true,
            }
        );
    }

    #[test]
    fn test_default_render() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        let ctx = egui::Context::default();

        let (_, output) = warm_up(&ctx, &mut toolbar);
        assert!(has_text(&output.shapes, DEFAULT_TITLE));
        assert!(has_fill(&output.shapes, styles::TOOLBAR_BG));
        let mut drawn = drawn_controls(&toolbar);
        drawn.sort_by_key(|action| format!("{:?}", action));
        assert_eq!(drawn, vec![ToolbarAction::OpenUserMenu, ToolbarAction::Search]);
    }

    #[test]
    fn test_rendered_controls_follow_each_flag() {
        let channel = AuthStatusChannel::default();
        for bits in 0u8..8 {
            let options = ToolbarOptions {
                show_search: bits & 1 != 0,
                show_notifications: bits & 2 != 0,
                show_menu: bits & 4 != 0,
                ..ToolbarOptions::default()
            };
            let mut toolbar =
                AppToolbar::new(options.clone(), Arc::new(channel.clone()), "assets/images/logo.png");
            let ctx = egui::Context::default();
            warm_up(&ctx, &mut toolbar);

            let drawn = drawn_controls(&toolbar);
            assert_eq!(drawn.contains(&ToolbarAction::Search), options.show_search);
            assert_eq!(
                drawn.contains(&ToolbarAction::Notifications),
                options.show_notifications
            );
            assert_eq!(drawn.contains(&ToolbarAction::OpenUserMenu), options.show_menu);
            assert_eq!(drawn.len(), bits.count_ones() as usize);

            for (expected, rect) in toolbar.controls().to_vec() {
                let actions = click(&ctx, &mut toolbar, rect.center(), false);
                assert_eq!(actions, vec![expected], "flags {:03b}", bits);
            }
        }
    }

    #[test]
    fn test_transparent_flag_controls_fill() {
        let channel = AuthStatusChannel::default();
        for transparent in [false, true] {
            let options = ToolbarOptions {
                transparent,
                ..ToolbarOptions::default()
            };
            let mut toolbar =
                AppToolbar::new(options, Arc::new(channel.clone()), "assets/images/logo.png");
            let ctx = egui::Context::default();

            let (_, output) = warm_up(&ctx, &mut toolbar);
            assert_eq!(has_fill(&output.shapes, styles::TOOLBAR_BG), !transparent);
        }
    }

    #[test]
    fn test_bare_bar_click_is_header_tap() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        let ctx = egui::Context::default();
        warm_up(&ctx, &mut toolbar);

        let actions = click(&ctx, &mut toolbar, egui::pos2(300.0, 20.0), false);
        assert_eq!(actions, vec![ToolbarAction::HeaderTapped]);
    }

    #[test]
    fn test_click_on_covering_layer_is_not_header_tap() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        let ctx = egui::Context::default();
        for _ in 0..2 {
            render(&ctx, &mut toolbar, Vec::new(), true);
        }

        let actions = click(&ctx, &mut toolbar, egui::pos2(300.0, 20.0), true);
        assert!(actions.is_empty(), "got {:?}", actions);
    }

    #[test]
    fn test_logged_out_until_first_emission() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        assert!(!toolbar.is_logged_in());

        toolbar.start().unwrap();
        toolbar.sync_auth();
        assert!(!toolbar.is_logged_in());
    }

    #[test]
    fn test_auth_emissions_drive_state() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        toolbar.start().unwrap();

        channel.emit(Some(true));
        toolbar.sync_auth();
        assert!(toolbar.is_logged_in());

        channel.emit(Some(false));
        toolbar.sync_auth();
        assert!(!toolbar.is_logged_in());

        channel.emit(Some(true));
        toolbar.sync_auth();
        channel.emit(None);
        toolbar.sync_auth();
        assert!(!toolbar.is_logged_in());
    }

    #[test]
    fn test_stream_failure_keeps_last_state() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        toolbar.start().unwrap();

        channel.emit(Some(true));
        toolbar.sync_auth();
        channel.fail("connection reset");
        toolbar.sync_auth();
        assert!(toolbar.is_logged_in());
        assert!(toolbar.has_subscription());

        channel.emit(Some(false));
        toolbar.sync_auth();
        assert!(toolbar.is_logged_in());
    }

    #[test]
    fn test_stop_releases_subscription() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        toolbar.start().unwrap();
        assert!(toolbar.has_subscription());
        assert_eq!(channel.subscriber_count(), 1);

        toolbar.stop();
        assert!(!toolbar.has_subscription());
        assert_eq!(channel.subscriber_count(), 0);

        channel.emit(Some(true));
        toolbar.sync_auth();
        assert!(!toolbar.is_logged_in());
    }

    #[test]
    fn test_lifecycle_is_linear() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        assert_eq!(toolbar.phase(), Phase::Uninitialized);

        toolbar.start().unwrap();
        assert_eq!(toolbar.phase(), Phase::Active);
        assert!(matches!(toolbar.start(), Err(Error::Lifecycle(_))));

        toolbar.stop();
        toolbar.stop();
        assert_eq!(toolbar.phase(), Phase::Destroyed);
        assert!(matches!(toolbar.start(), Err(Error::Lifecycle(_))));
    }

    #[test]
    fn test_headless_render_falls_back_to_placeholder() {
        let channel = AuthStatusChannel::default();
        let mut toolbar = toolbar(&channel);
        toolbar.start().unwrap();

        let ctx = egui::Context::default();
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let action = toolbar.show(ui);
                    assert_eq!(action, None);
                });
            });
        }

        assert!(toolbar.logo().is_placeholder());
    }
}
