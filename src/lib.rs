//! LX Palette - host-side SysEx protocol layer for the LX Palette lighting device
//!
//! This library encodes palette-editing commands into MIDI SysEx frames,
//! parses the device's responses, maps firmware error codes to user-facing
//! errors and keeps an in-memory model of the 8 palette slots in sync with
//! the device.
//!
//! # Quick Start
//!
//! ```rust
//! use bytes::Bytes;
//! use lxpalette::{PaletteCommand, Rgb12, decode, encode};
//!
//! // Slot 2, colour in wire form (R, B, G)
//! let mut payload = vec![0x02];
//! payload.extend_from_slice(&Rgb12::new(4095, 0, 2048).encode()?);
//! let frame = encode(PaletteCommand::SetRgb, &payload)?;
//! assert_eq!(frame[..5], [0xF0, 0x77, 0x01, 0x41, 0x03]);
//!
//! let response = decode(
//!     Bytes::from_static(&[0xF0, 0x77, 0x01, 0x41, 0x03, 0x01, 0xF7]),
//!     PaletteCommand::SetRgb,
//! )?;
//! assert!(response.is_success());
//! # Ok::<(), lxpalette::Error>(())
//! ```
//!
//! Most hosts drive the device through a [`CommandDispatcher`] wrapping
//! their own [`MidiTransport`].
//!
//! # Features
//!
//! - **Strict framing** - every outbound byte checked 7-bit safe, every
//!   inbound frame validated before its payload is read
//! - **Firmware error table** - all 15 device error codes as a closed enum
//! - **Slot cache** - palettes invalidated on every write so stale colours
//!   never leak into later saves
//! - **Serde support** - optional `serde` feature for the data model

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod dispatcher;
pub mod palette;
pub mod protocol;
pub mod transport;

pub use dispatcher::{CommandDispatcher, DispatchOutput, Operation};
pub use palette::{HardwareVersion, LedAddress, LedField, Palette, PaletteModel, SlotInfo};
pub use protocol::{
    AppError, Error, ErrorCategory, FirmwareError, MetricsSnapshot, PaletteCommand, Result,
    Rgb12, SlotIndex, SlotStatus, SysExResponse, decode, encode,
};
pub use transport::{MidiTransport, TransportConfig, TransportError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot of process-wide protocol counters
#[must_use]
pub fn metrics() -> MetricsSnapshot {
    protocol::metrics::Metrics::totals()
}
