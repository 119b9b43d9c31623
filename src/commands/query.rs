//! Query (read-only) command handlers.

use std::path::Path;

use super::{write_text, CommandResult};
use blusb_keyboard::Controller;

/// Get firmware version
pub fn version(controller: &Controller) -> CommandResult {
    let version = controller
        .get_version()
        .map_err(|e| format!("Get version error: {e}"))?;
    println!("Version {version}");
    Ok(())
}

/// Get lock LED brightness
pub fn brightness(controller: &Controller) -> CommandResult {
    let b = controller
        .get_brightness()
        .map_err(|e| format!("Get brightness error: {e}"))?;
    println!("Brightness");
    println!("\tUSB is {}/255", b.usb);
    println!("\tBluetooth is {}/255", b.bt);
    Ok(())
}

/// Get debounce time
pub fn debounce(controller: &Controller) -> CommandResult {
    let dur = controller
        .get_debounce()
        .map_err(|e| format!("Get debounce error: {e}"))?;
    println!("Debounce time is {dur:?}");
    Ok(())
}

/// Print all layers, optionally saving the text form
pub fn layers(controller: &Controller, to: Option<&Path>) -> CommandResult {
    let layers = controller
        .get_layers()
        .map_err(|e| format!("Get layers error: {e}"))?;
    print!("{layers}");

    if let Some(path) = to {
        write_text(path, &layers.to_text())?;
    }
    Ok(())
}

/// Print the macro table, optionally saving the text form
pub fn macros(controller: &Controller, to: Option<&Path>) -> CommandResult {
    let table = controller
        .get_macros()
        .map_err(|e| format!("Get macros error: {e}"))?;
    print!("{table}");

    if let Some(path) = to {
        write_text(path, &table.to_text())?;
    }
    Ok(())
}
