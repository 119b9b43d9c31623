//! hidapi-backed transport for a controller attached over USB

use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::feature;
use crate::types::TransportDeviceInfo;
use crate::ReportTransport;

/// HID transport using feature reports on the controller's default interface
///
/// hidapi expects the report id in byte 0 of every buffer. Outbound reports
/// already start with their feature id; inbound reports get the id prepended
/// for the request and stripped from the result.
pub struct HidReportTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
}

impl HidReportTransport {
    /// Open the first device matching `vid`/`pid`
    pub fn open(vid: u16, pid: u16) -> Result<Self, TransportError> {
        let api = HidApi::new()?;

        let path = api
            .device_list()
            .find(|d| d.vendor_id() == vid && d.product_id() == pid)
            .map(|d| d.path().to_string_lossy().into_owned())
            .ok_or_else(|| {
                TransportError::DeviceNotFound(format!("no controller with id {vid:04x}:{pid:04x}"))
            })?;

        let device = api.open(vid, pid)?;
        let info = TransportDeviceInfo {
            vid,
            pid,
            device_path: path,
            manufacturer: device.get_manufacturer_string().ok().flatten(),
            product_name: device.get_product_string().ok().flatten(),
        };
        debug!("Opened controller: {}", info);

        Ok(Self {
            device: Mutex::new(device),
            info,
        })
    }
}

impl ReportTransport for HidReportTransport {
    fn get_report(&self, feature_id: u8, len: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; len + 1];
        buf[0] = feature_id;

        let n = self.device.lock().get_feature_report(&mut buf)?;
        let got = n.saturating_sub(1);
        debug!(
            "Control in (feat={} 0x{:02X}, {} bytes): {:02X?}",
            feature::name(feature_id),
            feature_id,
            got,
            &buf[1..1 + got.min(len)]
        );
        if got < len {
            return Err(TransportError::ShortTransfer { expected: len, got });
        }

        buf.remove(0);
        buf.truncate(len);
        Ok(buf)
    }

    fn set_report(&self, data: &[u8]) -> Result<(), TransportError> {
        debug!("Control out ({} bytes): {:02X?}", data.len(), data);
        self.device.lock().send_feature_report(data)?;
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
