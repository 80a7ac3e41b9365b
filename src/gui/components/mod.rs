// GUI Components module
mod logo;
mod status_bar;
mod toolbar;
mod user_menu;

pub use logo::{LogoImage, PLACEHOLDER_LOGO};
pub use status_bar::{StatusBar, StatusKind};
pub use toolbar::{Affordances, AppToolbar, ToolbarAction, ToolbarOptions, DEFAULT_TITLE};
pub use user_menu::{UserMenu, UserMenuAction};
