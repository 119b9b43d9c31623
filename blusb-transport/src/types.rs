//! Common types for transport layer

use std::fmt;

/// Device identification information
#[derive(Debug, Clone, Default)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Manufacturer string if available
    pub manufacturer: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl fmt::Display for TransportDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Path: {} Manufacturer: {} ({:04x}) Product: {} ({:04x})",
            self.device_path,
            self.manufacturer.as_deref().unwrap_or("unknown"),
            self.vid,
            self.product_name.as_deref().unwrap_or("unknown"),
            self.pid,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_falls_back_to_unknown() {
        let info = TransportDeviceInfo {
            vid: 0x04b3,
            pid: 0x301c,
            device_path: "/dev/hidraw3".into(),
            manufacturer: None,
            product_name: Some("Blusb".into()),
        };
        assert_eq!(
            info.to_string(),
            "Path: /dev/hidraw3 Manufacturer: unknown (04b3) Product: Blusb (301c)"
        );
    }
}
