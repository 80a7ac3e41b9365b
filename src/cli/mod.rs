use clap::{Args, Parser, Subcommand};

use crate::gui::ToolbarOptions;

#[derive(Parser, Debug)]
#[command(name = "tawfir-toolbar")]
#[command(author, version, about = "Tawfir application toolbar - runs the GUI by default", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub toolbar: ToolbarArgs,
}

impl Cli {
    /// Default logger filter: `debug` when verbose, otherwise the configured level.
    pub fn log_filter<'a>(&self, configured: &'a str) -> &'a str {
        if self.verbose {
            "debug"
        } else {
            configured
        }
    }
}

/// One-run overrides for the `[toolbar]` config table.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolbarArgs {
    /// Title shown in the toolbar
    #[arg(long)]
    pub title: Option<String>,

    /// Hide the search button
    #[arg(long)]
    pub no_search: bool,

    /// Show the notifications button
    #[arg(long)]
    pub notifications: bool,

    /// Hide the menu trigger
    #[arg(long)]
    pub no_menu: bool,

    /// Draw the toolbar without a background
    #[arg(long)]
    pub transparent: bool,
}

impl ToolbarArgs {
    pub fn apply(&self, options: &mut ToolbarOptions) {
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if self.no_search {
            options.show_search = false;
        }
        if self.notifications {
            options.show_notifications = true;
        }
        if self.no_menu {
            options.show_menu = false;
        }
        if self.transparent {
            options.transparent = true;
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start a local session
    Login {
        /// Name to sign in with
        user_name: String,
    },

    /// End the current session
    Logout,

    /// Show session state and the effective toolbar configuration
    Status,

    /// Launch the GUI
    Gui,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_launches_gui() {
        let cli = Cli::try_parse_from(["tawfir-toolbar"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.toolbar, ToolbarArgs::default());
    }

    #[test]
    fn test_overrides_apply_to_options() {
        let cli = Cli::try_parse_from([
            "tawfir-toolbar",
            "--title",
            "Offers",
            "--no-search",
            "--notifications",
            "--transparent",
        ])
        .unwrap();

        let mut options = ToolbarOptions::default();
        cli.toolbar.apply(&mut options);
        assert_eq!(options.title, "Offers");
        assert!(!options.show_search);
        assert!(options.show_notifications);
        assert!(options.show_menu);
        assert!(options.transparent);
    }

    #[test]
    fn test_configured_level_reaches_logger() {
        let cli = Cli::try_parse_from(["tawfir-toolbar"]).unwrap();
        assert_eq!(cli.log_filter("trace"), "trace");

        let logger = env_logger::Builder::new()
            .parse_filters(cli.log_filter("debug"))
            .build();
        let debug = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("tawfir_toolbar")
            .build();
        assert!(log::Log::enabled(&logger, &debug));
    }

    #[test]
    fn test_verbose_overrides_configured_level() {
        let cli = Cli::try_parse_from(["tawfir-toolbar", "--verbose"]).unwrap();
        assert_eq!(cli.log_filter("warn"), "debug");
    }

    #[test]
    fn test_login_subcommand() {
        let cli = Cli::try_parse_from(["tawfir-toolbar", "-v", "login", "salma"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Login {
                user_name: "salma".to_string()
            })
        );
    }
}
