//! Blusb controller CLI
//!
//! Reads and writes the settings, keymap layers and macro table of a Blusb
//! Universal BT-USB Model M controller.

use clap::Parser;
use tracing::info;

use blusb::Config;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.verbose {
        for directive in ["blusb=debug", "blusb_keyboard=debug", "blusb_transport=debug"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    info!("Loading config from {:?}", config_path);
    let config = Config::load(&config_path)?;

    let vid = cli.vid.unwrap_or(config.device.vid);
    let pid = cli.pid.unwrap_or(config.device.pid);

    let controller = commands::open_controller(vid, pid, cli.check)?;
    println!("Blusb Controller - {controller}\n");
    if cli.check && cli.command.writes() {
        println!("Check mode: nothing will be written\n");
    }

    match cli.command {
        // === Query Commands ===
        Commands::Version => commands::query::version(&controller)?,
        Commands::Brightness => commands::query::brightness(&controller)?,
        Commands::Debounce => commands::query::debounce(&controller)?,
        Commands::Layers { to } => commands::query::layers(&controller, to.as_deref())?,
        Commands::Macros { to } => commands::query::macros(&controller, to.as_deref())?,
        Commands::MonitorMatrix { timeout } => {
            commands::monitor::monitor_matrix(&controller, &config.monitor, timeout).await?
        }

        // === Set Commands ===
        Commands::SetBrightness { usb, bt } => {
            commands::set::set_brightness(&controller, usb, bt)?
        }
        Commands::SetDebounce { ms } => commands::set::set_debounce(&controller, ms)?,
        Commands::SetLayers { file } => commands::set::set_layers(&controller, &file)?,
        Commands::SetMacros { file } => commands::set::set_macros(&controller, &file)?,

        // === Bootloader ===
        Commands::EnterBoot => commands::boot::enter_boot(&controller)?,
        Commands::ExitBoot => commands::boot::exit_boot(&controller)?,
    }

    Ok(())
}
