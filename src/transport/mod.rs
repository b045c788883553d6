//! MIDI transport collaborator interface
//!
//! The protocol layer does not open devices or move bytes itself. A host
//! supplies a [`MidiTransport`] that sends framed SysEx buffers and waits
//! for the next inbound one.

mod error;

use std::time::Duration;

pub use error::TransportError;

use crate::protocol::RESPONSE_TIMEOUT_MS;

/// Transport configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportConfig {
    /// How long to wait for a response before giving up.
    pub response_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_millis(RESPONSE_TIMEOUT_MS),
        }
    }
}

/// Byte-level MIDI I/O used by the dispatcher.
///
/// The device matches responses to requests purely by arrival order, so
/// callers must keep at most one exchange in flight per connection.
pub trait MidiTransport {
    /// Send one complete SysEx frame.
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the next complete SysEx frame.
    ///
    /// Returns [`TransportError::Timeout`] when nothing arrives in time.
    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

impl<T: MidiTransport + ?Sized> MidiTransport for &mut T {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        (**self).send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        (**self).receive(timeout)
    }
}

impl<T: MidiTransport + ?Sized> MidiTransport for Box<T> {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        (**self).send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        (**self).receive(timeout)
    }
}
