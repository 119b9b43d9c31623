// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blusb")]
#[command(author, version, about = "Blusb Universal BT-USB Model M controller configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Check mode: perform reads but skip every write to the controller
    #[arg(long, global = true)]
    pub check: bool,

    /// Log every report transferred (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/blusb/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// USB vendor id, hex (overrides config)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub vid: Option<u16>,

    /// USB product id, hex (overrides config)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub pid: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Query Commands ===
    /// Get firmware version
    #[command(visible_alias = "ver")]
    Version,

    /// Get USB and Bluetooth lock LED brightness
    Brightness,

    /// Get debounce time
    Debounce,

    /// Get layers, optionally saving them as text
    Layers {
        /// Write the layers to this file
        #[arg(long, value_name = "FILE")]
        to: Option<PathBuf>,
    },

    /// Get macro keys, optionally saving them as text
    Macros {
        /// Write the macro table to this file
        #[arg(long, value_name = "FILE")]
        to: Option<PathBuf>,
    },

    /// Print matrix positions of pressed keys
    #[command(name = "monitor-matrix", visible_alias = "matrix")]
    MonitorMatrix {
        /// Stop after this many seconds (overrides config)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    // === Set Commands ===
    /// Set USB and Bluetooth lock LED brightness (0-255 each)
    SetBrightness {
        /// Brightness over USB
        usb: u32,
        /// Brightness over Bluetooth
        bt: u32,
    },

    /// Set debounce time in milliseconds (1-255)
    SetDebounce {
        /// Debounce time (ms)
        ms: u64,
    },

    /// Set layers from a text file
    SetLayers {
        /// Layers text file
        file: PathBuf,
    },

    /// Set macro keys from a text file
    SetMacros {
        /// Macro table text file
        file: PathBuf,
    },

    // === Bootloader ===
    /// Reboot the controller into its bootloader
    EnterBoot,

    /// Leave the bootloader and start the firmware
    ExitBoot,
}

impl Commands {
    /// True for commands that write to the controller
    pub fn writes(&self) -> bool {
        matches!(
            self,
            Commands::SetBrightness { .. }
                | Commands::SetDebounce { .. }
                | Commands::SetLayers { .. }
                | Commands::SetMacros { .. }
                | Commands::EnterBoot
                | Commands::ExitBoot
        )
    }
}

/// Parse a USB id given in hex, with or without `0x`
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex id '{s}': {e}"))
}
