//! Set (write) command handlers.

use std::path::Path;
use std::time::Duration;

use super::{read_text, CommandResult};
use blusb_keyboard::{Controller, Layers, MacroTable};

/// Set lock LED brightness
pub fn set_brightness(controller: &Controller, usb: u32, bt: u32) -> CommandResult {
    controller
        .set_brightness(usb, bt)
        .map_err(|e| format!("Set brightness error: {e}"))?;
    println!("Brightness set to USB {usb}/255, Bluetooth {bt}/255");
    Ok(())
}

/// Set debounce time
pub fn set_debounce(controller: &Controller, ms: u64) -> CommandResult {
    controller
        .set_debounce(Duration::from_millis(ms))
        .map_err(|e| format!("Set debounce error: {e}"))?;
    println!("Debounce set to {ms} ms");
    Ok(())
}

/// Parse a layers text file and write it to the controller
pub fn set_layers(controller: &Controller, file: &Path) -> CommandResult {
    let text = read_text(file)?;
    let layers = Layers::from_text(&text)
        .map_err(|e| format!("Parse layers error ({}): {e}", file.display()))?;
    controller
        .set_layers(&layers)
        .map_err(|e| format!("Set layers error: {e}"))?;
    println!("Wrote {} layers", layers.len());
    Ok(())
}

/// Parse a macro text file and write it to the controller
pub fn set_macros(controller: &Controller, file: &Path) -> CommandResult {
    let text = read_text(file)?;
    let table = MacroTable::from_text(&text)
        .map_err(|e| format!("Parse macros error ({}): {e}", file.display()))?;
    controller
        .set_macros(&table)
        .map_err(|e| format!("Set macros error: {e}"))?;
    println!("Wrote macro table");
    Ok(())
}
