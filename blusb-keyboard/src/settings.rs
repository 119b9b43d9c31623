//! Controller settings types

use std::fmt;
use std::time::Duration;

use blusb_transport::protocol::debounce;
use blusb_transport::{BrightnessResponse, MatrixResponse, SetBrightness, SetDebounce, VersionResponse};

use crate::error::KeyboardError;

/// Num Lock, Caps Lock and Scroll Lock LED brightness, 0-255 per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Brightness {
    /// Brightness while connected over USB
    pub usb: u8,
    /// Brightness while connected over Bluetooth
    pub bt: u8,
}

impl Brightness {
    /// Validate caller-supplied levels
    ///
    /// Both values must fit in 0-255; nothing is truncated.
    pub fn new(usb: u32, bt: u32) -> Result<Self, KeyboardError> {
        match (u8::try_from(usb), u8::try_from(bt)) {
            (Ok(usb), Ok(bt)) => Ok(Self { usb, bt }),
            _ => Err(KeyboardError::InvalidParameter(format!(
                "brightness value must be between 0 and 255 (got usb={usb}, bt={bt})"
            ))),
        }
    }

    pub(crate) fn to_command(self) -> SetBrightness {
        SetBrightness {
            usb: self.usb,
            bt: self.bt,
        }
    }
}

impl From<BrightnessResponse> for Brightness {
    fn from(resp: BrightnessResponse) -> Self {
        Self {
            usb: resp.usb,
            bt: resp.bt,
        }
    }
}

/// Validate a debounce duration and convert it to the wire byte
///
/// Valid range is 1ms to 255ms inclusive; any sub-millisecond remainder is
/// dropped.
pub fn debounce_command(dur: Duration) -> Result<SetDebounce, KeyboardError> {
    let min = Duration::from_millis(debounce::MIN_MS);
    let max = Duration::from_millis(debounce::MAX_MS);
    if dur < min || dur > max {
        return Err(KeyboardError::InvalidParameter(format!(
            "debounce duration must be between 1ms and 255ms (got {dur:?})"
        )));
    }
    Ok(SetDebounce {
        ms: dur.as_millis() as u8,
    })
}

/// Firmware version, usually written as "major.minor"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl From<VersionResponse> for FirmwareVersion {
    fn from(resp: VersionResponse) -> Self {
        Self {
            major: resp.major,
            minor: resp.minor,
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Matrix row and column of the key being pressed
///
/// The all-zero value is the "no key pressed" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatrixPos {
    pub row: u8,
    pub col: u8,
}

impl MatrixPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// False for the idle sentinel
    pub fn is_pressed(&self) -> bool {
        self.row != 0 || self.col != 0
    }
}

impl From<MatrixResponse> for MatrixPos {
    fn from(resp: MatrixResponse) -> Self {
        Self::new(resp.row, resp.col)
    }
}

impl fmt::Display for MatrixPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row: {} Col: {}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_bounds() {
        assert!(Brightness::new(256, 0).is_err());
        assert!(Brightness::new(0, 256).is_err());
        assert_eq!(
            Brightness::new(255, 0).unwrap(),
            Brightness { usb: 255, bt: 0 }
        );
    }

    #[test]
    fn test_debounce_bounds() {
        assert!(debounce_command(Duration::ZERO).is_err());
        assert!(debounce_command(Duration::from_micros(999)).is_err());
        assert!(debounce_command(Duration::from_millis(256)).is_err());
        assert!(debounce_command(Duration::from_micros(255_500)).is_err());
        assert_eq!(debounce_command(Duration::from_millis(1)).unwrap().ms, 1);
        assert_eq!(debounce_command(Duration::from_millis(255)).unwrap().ms, 255);
        assert_eq!(debounce_command(Duration::from_micros(7_900)).unwrap().ms, 7);
    }

    #[test]
    fn test_version_display() {
        let v = FirmwareVersion { major: 1, minor: 12 };
        assert_eq!(v.to_string(), "1.12");
    }

    #[test]
    fn test_matrix_sentinel() {
        assert!(!MatrixPos::default().is_pressed());
        assert!(MatrixPos::new(0, 4).is_pressed());
        assert!(MatrixPos::new(2, 0).is_pressed());
    }
}
