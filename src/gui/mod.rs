mod app;
pub mod components;
pub mod events;
pub mod lifecycle;
mod modal_layer;
pub mod styles;

pub use app::ToolbarApp;
pub use components::{
    Affordances, AppToolbar, LogoImage, ToolbarAction, ToolbarOptions, UserMenu, UserMenuAction,
};
pub use events::{TapEvent, TapRoute, TapTarget};
pub use lifecycle::{Lifecycle, Liveness, LivenessToken, Phase};
