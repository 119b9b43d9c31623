//! Configuration protocol for the Blusb Universal BT-USB Model M controller
//!
//! Sits on top of any `ReportTransport` (hidapi, dry-run, scripted) and
//! exposes the controller's settings, keymap layers and macro table as typed
//! values. Every operation is a self-contained, strictly sequential series of
//! feature report transfers; nothing is cached between calls.

pub mod error;
pub mod layers;
pub mod macros;
pub mod monitor;
pub mod pager;
pub mod settings;

mod hex;

pub use error::{FormatError, KeyboardError, ProtocolError};
pub use layers::{Layer, Layers};
pub use macros::{Macro, MacroTable};
pub use monitor::{cancel_pair, CancelHandle, CancelSignal, MatrixMonitor, MonitorConfig};
pub use pager::{PageHeader, PageReader, PageStatus, PageWriter};
pub use settings::{Brightness, FirmwareVersion, MatrixPos};

use std::fmt;
use std::time::Duration;

use blusb_transport::protocol::{feature, macros as macro_proto, page};
use blusb_transport::{
    BoxedTransport, BrightnessResponse, DebounceResponse, EnterBootloader, ExitBootloader,
    MatrixResponse, TransportExt, VersionResponse,
};
use tracing::{debug, info};

/// Handle to one controller
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Controller {
    transport: BoxedTransport,
}

impl Controller {
    pub fn new(transport: BoxedTransport) -> Self {
        Self { transport }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &BoxedTransport {
        &self.transport
    }

    // === Settings ===

    /// Lock LED brightness for USB and Bluetooth modes
    pub fn get_brightness(&self) -> Result<Brightness, KeyboardError> {
        let resp: BrightnessResponse = self.transport.query()?;
        Ok(resp.into())
    }

    /// Set lock LED brightness; each value must be 0-255
    pub fn set_brightness(&self, usb: u32, bt: u32) -> Result<(), KeyboardError> {
        let brightness = Brightness::new(usb, bt)?;
        self.transport.send(&brightness.to_command())?;
        info!("Brightness set: usb={} bt={}", brightness.usb, brightness.bt);
        Ok(())
    }

    pub fn get_debounce(&self) -> Result<Duration, KeyboardError> {
        let resp: DebounceResponse = self.transport.query()?;
        Ok(Duration::from_millis(resp.ms as u64))
    }

    /// Set debounce time; valid range is 1ms to 255ms
    pub fn set_debounce(&self, dur: Duration) -> Result<(), KeyboardError> {
        let cmd = settings::debounce_command(dur)?;
        self.transport.send(&cmd)?;
        info!("Debounce set: {}ms", cmd.ms);
        Ok(())
    }

    pub fn get_version(&self) -> Result<FirmwareVersion, KeyboardError> {
        let resp: VersionResponse = self.transport.query()?;
        Ok(resp.into())
    }

    /// Position of the key held right now, (0, 0) when none
    ///
    /// Non-blocking: the controller answers immediately.
    pub fn get_matrix(&self) -> Result<MatrixPos, KeyboardError> {
        let resp: MatrixResponse = self.transport.query()?;
        Ok(resp.into())
    }

    // === Keymap ===

    /// Read every configured layer
    ///
    /// Pages are requested one at a time until the controller sends the page
    /// whose number equals the total. Any bad page aborts the read.
    pub fn get_layers(&self) -> Result<Layers, KeyboardError> {
        let mut reader = PageReader::new(feature::LAYERS);
        loop {
            let data = self.transport.get_report(feature::LAYERS, page::SIZE)?;
            if reader.push(&data)? == PageStatus::Complete {
                break;
            }
        }
        debug!(
            "Layer read complete: {} pages, {} bytes",
            reader.pages_read(),
            reader.bytes().len()
        );

        let layers = Layers::from_bytes(&reader.into_bytes())?;
        info!("Read {} layers", layers.len());
        Ok(layers)
    }

    /// Replace every layer
    ///
    /// Nothing is written if the layers do not fit the page count limit. A
    /// failure partway leaves the controller with a partial write.
    pub fn set_layers(&self, layers: &Layers) -> Result<(), KeyboardError> {
        let blob = layers.to_bytes();
        let writer = PageWriter::new(feature::LAYERS, &blob)?;
        let total = writer.total_pages();

        for page in writer {
            self.transport.set_report(&page)?;
        }
        info!("Wrote {} layers in {} pages", layers.len(), total);
        Ok(())
    }

    // === Macros ===

    pub fn get_macros(&self) -> Result<MacroTable, KeyboardError> {
        let data = self
            .transport
            .get_report(feature::MACROS, macro_proto::TABLE_SIZE)?;
        Ok(MacroTable::from_device_bytes(&data)?)
    }

    pub fn set_macros(&self, table: &MacroTable) -> Result<(), KeyboardError> {
        self.transport.set_report(&table.to_transport_bytes())?;
        info!("Macro table written");
        Ok(())
    }

    // === Bootloader ===

    /// Reboot into the bootloader; the controller re-enumerates afterwards
    pub fn enter_bootloader(&self) -> Result<(), KeyboardError> {
        self.transport.send(&EnterBootloader)?;
        info!("Bootloader requested");
        Ok(())
    }

    /// Leave the bootloader and boot the firmware
    pub fn exit_bootloader(&self) -> Result<(), KeyboardError> {
        self.transport.send(&ExitBootloader)?;
        info!("Firmware boot requested");
        Ok(())
    }
}

impl fmt::Display for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transport.device_info())
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("device", self.transport.device_info())
            .finish()
    }
}
