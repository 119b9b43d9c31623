//! Transport abstraction layer for Blusb controller communication
//!
//! The controller is configured entirely through HID feature reports on its
//! control endpoint. This crate provides the two primitives everything else is
//! built on ("get feature report" and "set feature report") plus:
//!
//! - Wire constants (feature ids, report and page sizes)
//! - Typed fixed-field reports (`FeatureCommand` / `FeatureResponse`)
//! - An hidapi backend and a dry-run middleware
//! - A scripted transport for tests (feature `mock`)

pub mod command;
pub mod error;
pub mod protocol;
pub mod types;

mod dry_run;
mod hid;

#[cfg(feature = "mock")]
mod mock;

pub use command::{
    BrightnessResponse, DebounceResponse, EnterBootloader, ExitBootloader, FeatureCommand,
    FeatureResponse, MatrixResponse, ParseError, QueryError, SetBrightness, SetDebounce,
    TransportExt, VersionResponse,
};
pub use dry_run::DryRunTransport;
pub use error::TransportError;
pub use hid::HidReportTransport;
pub use protocol::{PRODUCT_ID, REPORT_SIZE, VENDOR_ID};
pub use types::TransportDeviceInfo;

#[cfg(feature = "mock")]
pub use mock::ScriptedTransport;

use std::sync::Arc;

/// The core transport trait - all backends implement this
///
/// Calls are synchronous and strictly ordered: one report in flight at a time.
pub trait ReportTransport: Send + Sync {
    /// Read a feature report
    ///
    /// # Arguments
    /// * `feature_id` - Report id to request
    /// * `len` - Number of payload bytes expected
    ///
    /// # Returns
    /// The payload exactly as the device produced it. A transfer shorter than
    /// `len` is `TransportError::ShortTransfer`.
    fn get_report(&self, feature_id: u8, len: usize) -> Result<Vec<u8>, TransportError>;

    /// Write a feature report
    ///
    /// `data[0]` is the feature id.
    fn set_report(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn ReportTransport>;
