//! Bootloader command handlers.

use super::CommandResult;
use blusb_keyboard::Controller;

pub fn enter_boot(controller: &Controller) -> CommandResult {
    controller
        .enter_bootloader()
        .map_err(|e| format!("Enter bootloader error: {e}"))?;
    println!("Controller is restarting into the bootloader");
    Ok(())
}

pub fn exit_boot(controller: &Controller) -> CommandResult {
    controller
        .exit_bootloader()
        .map_err(|e| format!("Exit bootloader error: {e}"))?;
    println!("Controller is starting the firmware");
    Ok(())
}
