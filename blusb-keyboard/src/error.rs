//! Keyboard interface error types

use blusb_transport::{ParseError, QueryError, TransportError};
use thiserror::Error;

/// Errors from controller operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error, propagated unchanged
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Caller-supplied value out of range; nothing was written
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Wire framing violated
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Malformed binary or text encoding
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

impl From<QueryError> for KeyboardError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Transport(e) => KeyboardError::Transport(e),
            QueryError::Parse(e) => KeyboardError::Protocol(e.into()),
        }
    }
}

/// Framing violations on fixed reports and multi-page transfers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{feature} report too short: expected {expected} bytes, got {got}")]
    ShortReport {
        feature: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("page too short: {got} bytes, header needs {expected}")]
    ShortPage { expected: usize, got: usize },

    #[error("unexpected feature id 0x{got:02X} on page (expected 0x{expected:02X} or 0x00)")]
    UnexpectedFeature { expected: u8, got: u8 },

    #[error("page out of sequence: expected page {expected}, got {got}")]
    OutOfSequence { expected: u8, got: u8 },

    #[error("total pages changed mid-transfer: was {was}, now {now}")]
    TotalPagesChanged { was: u8, now: u8 },

    #[error("page {page} beyond declared total of {total}")]
    PageBeyondTotal { page: u8, total: u8 },

    #[error("payload of {len} bytes needs {pages} pages (max 255)")]
    TooManyPages { len: usize, pages: usize },

    #[error("layer data truncated: {declared} layers declared, {decoded} present")]
    Truncated { declared: usize, decoded: usize },

    #[error("layer data is empty")]
    MissingLayerCount,
}

impl From<ParseError> for ProtocolError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::TooShort {
                feature,
                expected,
                got,
            } => ProtocolError::ShortReport {
                feature: blusb_transport::protocol::feature::name(feature),
                expected,
                got,
            },
        }
    }
}

/// Encoding errors; text variants name the offending line (1-based) and token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("line {line}: wrong number of fields: expected {expected}, got {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}, field {field}: invalid hex value {token:?}")]
    InvalidToken {
        line: usize,
        field: usize,
        token: String,
    },

    #[error("too many {what}: at most {max} allowed")]
    TooMany { what: &'static str, max: usize },

    #[error("{what} too short: expected {expected} bytes, got {got}")]
    ShortBinary {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("unexpected feature id 0x{got:02X} (expected 0x{expected:02X})")]
    FeatureMismatch { expected: u8, got: u8 },
}
