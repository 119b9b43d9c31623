//! Type-safe feature report builders and response parsers
//!
//! Writes carry the feature id at byte 0. Reads come back from the device
//! without it, so response offsets start at the first field.

use std::fmt;

use crate::error::TransportError;
use crate::protocol::{self, boot, feature, REPORT_SIZE};
use crate::ReportTransport;

// =============================================================================
// Core Traits
// =============================================================================

/// A report that can be serialized and sent with `set_report`
pub trait FeatureCommand: Sized {
    /// Feature id placed at byte 0
    const FEATURE: u8;

    /// Serialize fields (excluding feature id)
    fn to_data(&self) -> Vec<u8>;

    /// Build the complete 8-byte report
    fn build(&self) -> Vec<u8> {
        protocol::build_report(Self::FEATURE, &self.to_data())
    }
}

/// A report that can be requested with `get_report` and parsed
pub trait FeatureResponse: Sized {
    /// Feature id to request
    const FEATURE: u8;

    /// Minimum number of bytes the fields occupy
    const MIN_LEN: usize;

    /// Bytes to request from the transport
    const REPORT_LEN: usize = REPORT_SIZE;

    /// Parse from report bytes (no feature id prefix)
    fn from_data(data: &[u8]) -> Self;

    /// Parse with length validation
    fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::TooShort {
                feature: Self::FEATURE,
                expected: Self::MIN_LEN,
                got: data.len(),
            });
        }
        Ok(Self::from_data(data))
    }
}

/// Parse error for responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort {
        feature: u8,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort {
                feature: id,
                expected,
                got,
            } => write!(
                f,
                "{} report too short: expected {} bytes, got {}",
                feature::name(*id),
                expected,
                got
            ),
        }
    }
}

impl std::error::Error for ParseError {}

// =============================================================================
// Transport Extension for Typed Reports
// =============================================================================

/// Error from a typed query: either the transfer or the parse failed
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Typed send/query helpers available on every transport
pub trait TransportExt: ReportTransport {
    /// Build and send a typed report
    fn send<C: FeatureCommand>(&self, command: &C) -> Result<(), TransportError> {
        self.set_report(&command.build())
    }

    /// Request and parse a typed report
    fn query<R: FeatureResponse>(&self) -> Result<R, QueryError> {
        let data = self.get_report(R::FEATURE, R::REPORT_LEN)?;
        Ok(R::parse(&data)?)
    }
}

impl<T: ReportTransport + ?Sized> TransportExt for T {}

// =============================================================================
// Brightness
// =============================================================================

/// Set Num/Caps/Scroll Lock LED brightness for USB and Bluetooth modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBrightness {
    pub usb: u8,
    pub bt: u8,
}

impl FeatureCommand for SetBrightness {
    const FEATURE: u8 = feature::BRIGHTNESS;

    fn to_data(&self) -> Vec<u8> {
        vec![self.usb, self.bt]
    }
}

/// Brightness read back: `[usb, bt]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessResponse {
    pub usb: u8,
    pub bt: u8,
}

impl FeatureResponse for BrightnessResponse {
    const FEATURE: u8 = feature::BRIGHTNESS;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Self {
        Self {
            usb: data[0],
            bt: data[1],
        }
    }
}

// =============================================================================
// Debounce
// =============================================================================

/// Set debounce duration in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDebounce {
    pub ms: u8,
}

impl FeatureCommand for SetDebounce {
    const FEATURE: u8 = feature::DEBOUNCE;

    fn to_data(&self) -> Vec<u8> {
        vec![self.ms]
    }
}

/// Debounce read back: `[ms]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceResponse {
    pub ms: u8,
}

impl FeatureResponse for DebounceResponse {
    const FEATURE: u8 = feature::DEBOUNCE;
    const MIN_LEN: usize = 1;

    fn from_data(data: &[u8]) -> Self {
        Self { ms: data[0] }
    }
}

// =============================================================================
// Version / Matrix (read-only)
// =============================================================================

/// Firmware version: `[major, minor]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionResponse {
    pub major: u8,
    pub minor: u8,
}

impl FeatureResponse for VersionResponse {
    const FEATURE: u8 = feature::VERSION;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Self {
        Self {
            major: data[0],
            minor: data[1],
        }
    }
}

/// Matrix position of the key being pressed: `[row, col]`, all zero when idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixResponse {
    pub row: u8,
    pub col: u8,
}

impl FeatureResponse for MatrixResponse {
    const FEATURE: u8 = feature::MATRIX;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Self {
        Self {
            row: data[0],
            col: data[1],
        }
    }
}

// =============================================================================
// Bootloader
// =============================================================================

/// Ask the firmware to jump into the bootloader
#[derive(Debug, Clone, Copy, Default)]
pub struct EnterBootloader;

impl FeatureCommand for EnterBootloader {
    const FEATURE: u8 = feature::ENTER_BOOT;

    fn to_data(&self) -> Vec<u8> {
        vec![]
    }
}

/// Ask the bootloader to boot the firmware (bootloader id space)
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitBootloader;

impl FeatureCommand for ExitBootloader {
    const FEATURE: u8 = boot::EXIT;

    fn to_data(&self) -> Vec<u8> {
        vec![]
    }
}
