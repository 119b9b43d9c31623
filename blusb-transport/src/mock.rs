//! Scripted in-memory transport
//!
//! Replays a queue of get replies in order and records every set, so the
//! protocol layer can be driven deterministically without hardware.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::ReportTransport;

enum Reply {
    Data(Vec<u8>),
    Error(TransportError),
}

/// Transport that answers `get_report` from a script
///
/// Each reply is returned as-is (its length is not adjusted to the
/// requested length). Once the script runs dry every get fails with
/// `TransportError::Disconnected`.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sets: Mutex<Vec<Vec<u8>>>,
    requested: Mutex<Vec<u8>>,
    info: TransportDeviceInfo,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            sets: Mutex::new(Vec::new()),
            requested: Mutex::new(Vec::new()),
            info: TransportDeviceInfo {
                vid: crate::protocol::VENDOR_ID,
                pid: crate::protocol::PRODUCT_ID,
                device_path: "mock".into(),
                manufacturer: Some("Scripted".into()),
                product_name: Some("Blusb mock".into()),
            },
        }
    }

    /// Queue a reply for the next get
    pub fn push_reply(&self, data: Vec<u8>) {
        self.replies.lock().push_back(Reply::Data(data));
    }

    /// Queue several replies
    pub fn push_replies<I: IntoIterator<Item = Vec<u8>>>(&self, replies: I) {
        let mut queue = self.replies.lock();
        queue.extend(replies.into_iter().map(Reply::Data));
    }

    /// Queue a failure for the next get
    pub fn push_error(&self, error: TransportError) {
        self.replies.lock().push_back(Reply::Error(error));
    }

    /// Replies not consumed yet
    pub fn pending(&self) -> usize {
        self.replies.lock().len()
    }

    /// Every report passed to `set_report`, in order
    pub fn sets(&self) -> Vec<Vec<u8>> {
        self.sets.lock().clone()
    }

    /// Feature ids passed to `get_report`, in order
    pub fn requested(&self) -> Vec<u8> {
        self.requested.lock().clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportTransport for ScriptedTransport {
    fn get_report(&self, feature_id: u8, _len: usize) -> Result<Vec<u8>, TransportError> {
        self.requested.lock().push(feature_id);
        match self.replies.lock().pop_front() {
            Some(Reply::Data(data)) => Ok(data),
            Some(Reply::Error(e)) => Err(e),
            None => Err(TransportError::Disconnected),
        }
    }

    fn set_report(&self, data: &[u8]) -> Result<(), TransportError> {
        self.sets.lock().push(data.to_vec());
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
