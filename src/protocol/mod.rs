//! LX Palette SysEx protocol core
//!
//! This module provides the wire constants, command codes, colour codec,
//! firmware error table and frame codec.

mod codec;
mod color;
mod error;
pub(crate) mod error_table;
mod message;
pub(crate) mod metrics;
mod types;

pub use codec::{decode, encode, header};
pub use color::{CHANNEL_MAX, COLOR_WIRE_SIZE, Rgb12};
pub use error::{AppError, Error, ErrorCategory, ErrorKind, Result};
pub use error_table::{ErrorDescriptor, FirmwareError, UNKNOWN_ERROR, lookup};
pub use message::SysExResponse;
pub use metrics::MetricsSnapshot;
pub use types::{PaletteCommand, SlotIndex, SlotStatus};

pub(crate) use codec::HexBytes;

/// SysEx start byte
pub const SYSEX_START: u8 = 0xF0;

/// SysEx end byte
pub const SYSEX_END: u8 = 0xF7;

/// Manufacturer ID for LX Palette
pub const MANUFACTURER_ID: u8 = 0x77;

/// Device ID
pub const DEVICE_ID: u8 = 0x01;

/// Palette command category
pub const PALETTE_CATEGORY: u8 = 0x41;

/// Status byte for a successful response
pub const STATUS_SUCCESS: u8 = 0x01;

/// Status byte for a failed response
pub const STATUS_FAILURE: u8 = 0x00;

/// Frame prefix size: start byte plus manufacturer, device, category, command
pub const HEADER_SIZE: usize = 5;

/// Smallest valid response: prefix, status byte, end byte
pub const MIN_RESPONSE_SIZE: usize = HEADER_SIZE + 2;

/// Number of palette slots on the device
pub const SLOT_COUNT: usize = 8;

/// Maximum palette name length in bytes
pub const MAX_NAME_LEN: usize = 32;

/// Response timeout in milliseconds
pub const RESPONSE_TIMEOUT_MS: u64 = 500;
