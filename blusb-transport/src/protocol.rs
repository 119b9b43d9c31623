//! Protocol constants and utilities for Blusb controller communication

/// USB Vendor ID of the controller
pub const VENDOR_ID: u16 = 0x04B3;

/// USB Product ID of the controller
pub const PRODUCT_ID: u16 = 0x301C;

/// Size of every non-paged feature report
pub const REPORT_SIZE: usize = 8;

/// Firmware feature ids (report ids of the firmware's feature reports)
pub mod feature {
    /// Get or set layers (paged)
    pub const LAYERS: u8 = 0x01;
    /// Get or set the macro table
    pub const MACROS: u8 = 0x02;
    /// Read matrix position of the key currently pressed
    pub const MATRIX: u8 = 0x03;
    /// Get or set Num/Caps/Scroll Lock LED brightness
    pub const BRIGHTNESS: u8 = 0x04;
    /// Get firmware version
    pub const VERSION: u8 = 0x05;
    /// Get or set debounce duration
    pub const DEBOUNCE: u8 = 0x06;
    /// Enter bootloader
    pub const ENTER_BOOT: u8 = 0x07;

    /// Get human-readable name for a firmware feature id
    pub fn name(id: u8) -> &'static str {
        match id {
            LAYERS => "LAYERS",
            MACROS => "MACROS",
            MATRIX => "MATRIX",
            BRIGHTNESS => "BRIGHTNESS",
            VERSION => "VERSION",
            DEBOUNCE => "DEBOUNCE",
            ENTER_BOOT => "ENTER_BOOT",
            _ => "UNKNOWN",
        }
    }
}

/// Bootloader feature ids (separate id space, only valid in bootloader mode)
pub mod boot {
    /// Send firmware page data
    pub const PAGE_DATA: u8 = 0x01;
    /// Exit bootloader and boot the firmware
    pub const EXIT: u8 = 0x02;
}

/// Keymap matrix geometry
pub mod matrix {
    /// Rows per layer
    pub const ROWS: usize = 8;
    /// Columns per layer
    pub const COLS: usize = 20;
    /// Key codes per layer
    pub const KEYS: usize = ROWS * COLS;
    /// Maximum number of layers (1-byte count field)
    pub const MAX_LAYERS: usize = 255;
}

/// Layer page framing
pub mod page {
    /// Header: feature id, total pages, current page
    pub const HEADER_SIZE: usize = 3;
    /// Payload bytes per page
    pub const DATA_SIZE: usize = 256;
    /// Full page size on the wire
    pub const SIZE: usize = HEADER_SIZE + DATA_SIZE;
    /// Padding byte for the tail of the last page
    pub const PAD: u8 = 0xFF;
    /// Page counters are single bytes
    pub const MAX_PAGES: usize = 255;
}

/// Macro table layout
pub mod macros {
    /// Bytes per macro entry (mods, reserved, 6 keys)
    pub const ENTRY_SIZE: usize = 8;
    /// Key codes per entry
    pub const KEYS: usize = 6;
    /// Entries in the table
    pub const COUNT: usize = 24;
    /// Table size as read back from the device (no feature id)
    pub const TABLE_SIZE: usize = ENTRY_SIZE * COUNT;
}

/// Debounce limits in milliseconds
pub mod debounce {
    pub const MIN_MS: u64 = 1;
    pub const MAX_MS: u64 = 255;
}

/// Build a fixed-size feature report: `[feature] [data...] [zero padding]`
///
/// Data longer than the report is truncated.
pub fn build_report(feature: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; REPORT_SIZE];
    buf[0] = feature;
    let len = std::cmp::min(data.len(), REPORT_SIZE - 1);
    buf[1..1 + len].copy_from_slice(&data[..len]);
    buf
}
