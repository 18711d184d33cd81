use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = SunSpecError> = std::result::Result<T, E>;

/// Failures reported by a [`crate::modbus::ModbusTransport`].
///
/// Messages are stored as strings so the error can be cloned and handed to
/// every waiter of a shared model scan.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to connect to {target}: {reason}")]
    Connect { target: String, reason: String },

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("modbus exception: {0}")]
    Exception(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("expected {expected} registers, received {received}")]
    ShortResponse { expected: u16, received: usize },

    #[error("connection has been destroyed")]
    Destroyed,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SunSpecError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("not a SunSpec device (signature {0:#010x})")]
    SignatureMismatch(u32),

    #[error("no SunSpec {0} model address")]
    AddressNotFound(&'static str),

    #[error("{model} model ID {found} is not one of {expected:?}")]
    DecodeMismatch {
        model: &'static str,
        expected: &'static [u16],
        found: u16,
    },

    #[error("unsupported model ID {0}")]
    UnsupportedId(u16),

    #[error("{model} model needs {needed} registers, only {available} available")]
    ShortModel {
        model: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("malformed model chain: {0}")]
    MalformedModelChain(String),
}

impl SunSpecError {
    /// True when the cached address table no longer describes the device.
    pub fn is_stale_address(&self) -> bool {
        matches!(self, Self::DecodeMismatch { .. })
    }
}

/// Creates an anyhow error prefixed with the current file and line number
#[macro_export]
macro_rules! file_error {
    ($($arg:tt)*) => {
        anyhow::anyhow!("[{}:{}] {}", file!(), line!(), format!($($arg)*))
    };
}
