use clap::Parser;
use std::sync::Arc;
use tawfir_toolbar::{
    auth::SessionManager,
    cli::{Cli, Commands},
    config::Config,
    gui::ToolbarApp,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_filter(&config.log_level)),
    )
    .init();
    log::debug!("Configuration loaded");

    cli.toolbar.apply(&mut config.toolbar);

    let session = Arc::new(SessionManager::new()?);

    match cli.command.unwrap_or(Commands::Gui) {
        Commands::Gui => {
            let native_options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([900.0, 640.0])
                    .with_min_inner_size([480.0, 360.0])
                    .with_title(config.toolbar.title.clone()),
                ..Default::default()
            };

            if let Err(e) = eframe::run_native(
                "Tawfir",
                native_options,
                Box::new(move |cc| Ok(Box::new(ToolbarApp::new(cc, &config, session)?))),
            ) {
                eprintln!("Failed to run GUI: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Login { user_name } => {
            let current = session.login(&user_name)?;
            println!("✓ Signed in as {}", current.user_name);
            println!("  Session valid until {}", current.expires_at.format("%Y-%m-%d %H:%M UTC"));
        }

        Commands::Logout => {
            session.logout()?;
            println!("Successfully signed out");
        }

        Commands::Status => {
            println!("Tawfir toolbar");
            println!("==============");
            println!();
            match session.current() {
                Ok(current) => println!("Session:            signed in as {}", current.user_name),
                Err(_) => println!("Session:            signed out"),
            }
            println!("Config file:        {}", Config::config_path()?.display());
            println!("Logo:               {}", config.logo_path);
            println!();
            println!("Title:              {}", config.toolbar.title);
            println!("Search:             {}", on_off(config.toolbar.show_search));
            println!("Notifications:      {}", on_off(config.toolbar.show_notifications));
            println!("Menu:               {}", on_off(config.toolbar.show_menu));
            println!("Transparent:        {}", config.toolbar.transparent);
        }
    }

    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "shown"
    } else {
        "hidden"
    }
}
