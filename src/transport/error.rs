//! Transport-level error type covering timeouts and device I/O failures.

use core::fmt;
use std::time::Duration;

/// Failure reported by a [`super::MidiTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No response arrived within the timeout.
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
    /// The MIDI port is closed or the device was unplugged.
    Disconnected,
    /// Underlying MIDI I/O failure.
    Io(String),
}

impl TransportError {
    /// Timeout error for the given duration.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Whether this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { timeout_ms } => {
                write!(f, "no response within {timeout_ms} ms")
            }
            Self::Disconnected => write!(f, "MIDI device disconnected"),
            Self::Io(err) => write!(f, "MIDI I/O error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
