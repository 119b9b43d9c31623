//! DryRunTransport middleware for check mode
//!
//! Wraps any `ReportTransport` and forwards reads untouched while swallowing
//! every write, so a full get/set sequence can be exercised without changing
//! anything on the controller.
//!
//! # Example
//!
//! ```ignore
//! use blusb_transport::{DryRunTransport, HidReportTransport};
//!
//! let transport = HidReportTransport::open(VENDOR_ID, PRODUCT_ID)?;
//! let checked = DryRunTransport::wrap(Arc::new(transport));
//! // set_report calls are now logged and skipped
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::TransportError;
use crate::protocol::feature;
use crate::types::TransportDeviceInfo;
use crate::ReportTransport;

/// Transport middleware that skips all set operations
pub struct DryRunTransport {
    inner: Arc<dyn ReportTransport>,
    skipped: AtomicUsize,
}

impl DryRunTransport {
    /// Wrap a transport with dry-run middleware
    pub fn wrap(transport: Arc<dyn ReportTransport>) -> Arc<Self> {
        Arc::new(Self {
            inner: transport,
            skipped: AtomicUsize::new(0),
        })
    }

    /// Number of set reports swallowed so far
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }
}

impl ReportTransport for DryRunTransport {
    fn get_report(&self, feature_id: u8, len: usize) -> Result<Vec<u8>, TransportError> {
        self.inner.get_report(feature_id, len)
    }

    fn set_report(&self, data: &[u8]) -> Result<(), TransportError> {
        let id = data.first().copied().unwrap_or(0);
        info!(
            "Skipping set (feat={} 0x{:02X}, {} bytes)",
            feature::name(id),
            id,
            data.len()
        );
        debug!("Skipped report: {:02X?}", data);
        self.skipped.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::ScriptedTransport;

    #[test]
    fn test_sets_are_swallowed_and_gets_forwarded() {
        let mock = Arc::new(ScriptedTransport::new());
        mock.push_reply(vec![1, 2, 0, 0, 0, 0, 0, 0]);
        let dry = DryRunTransport::wrap(mock.clone());

        dry.set_report(&[feature::BRIGHTNESS, 1, 2, 0, 0, 0, 0, 0])
            .unwrap();
        let data = dry.get_report(feature::VERSION, 8).unwrap();

        assert_eq!(data[..2], [1, 2]);
        assert_eq!(dry.skipped(), 1);
        assert!(mock.sets().is_empty());
        assert_eq!(mock.requested(), vec![feature::VERSION]);
    }
}
