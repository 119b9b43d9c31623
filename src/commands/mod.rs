//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `query`: Read-only commands (version, brightness, debounce, layers, macros)
//! - `set`: Setting commands (set-brightness, set-debounce, set-layers, set-macros)
//! - `monitor`: Matrix monitor
//! - `boot`: Bootloader entry and exit

pub mod boot;
pub mod monitor;
pub mod query;
pub mod set;

use std::path::Path;
use std::sync::Arc;

use blusb_keyboard::Controller;
use blusb_transport::{BoxedTransport, DryRunTransport, HidReportTransport};
use tracing::info;

/// Result type for command handlers
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the controller by USB id
///
/// In check mode the transport is wrapped so writes are logged and skipped.
pub fn open_controller(
    vid: u16,
    pid: u16,
    check: bool,
) -> Result<Controller, Box<dyn std::error::Error>> {
    let hid = HidReportTransport::open(vid, pid)
        .map_err(|e| format!("Open device error: {e}"))?;
    let transport: BoxedTransport = if check {
        info!("Check mode: set reports will be skipped");
        DryRunTransport::wrap(Arc::new(hid))
    } else {
        Arc::new(hid)
    };
    Ok(Controller::new(transport))
}

/// Read a text file for one of the `set-*` commands
pub(crate) fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Read {} error: {e}", path.display()).into())
}

/// Save a text rendering for `--to`
pub(crate) fn write_text(path: &Path, text: &str) -> CommandResult {
    std::fs::write(path, text).map_err(|e| format!("Save {} error: {e}", path.display()))?;
    println!("Saved to {}", path.display());
    Ok(())
}
