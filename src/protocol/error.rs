//! Palette protocol error types

use std::fmt;

use thiserror::Error;

use super::{FirmwareError, PaletteCommand, SlotIndex, SlotStatus};
use crate::transport::TransportError;

/// Errors detected locally while encoding requests or decoding responses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Slot number outside `0..8`
    #[error("invalid slot number: {slot} (expected 0-7)")]
    InvalidSlot {
        /// Offending slot number
        slot: u8,
    },

    /// Track index outside `0..4`
    #[error("invalid track index: {track} (expected 0-3)")]
    InvalidTrack {
        /// Offending track index
        track: u8,
    },

    /// Brightness level not valid for the addressed LED field
    #[error("invalid brightness index {level} (max {max})")]
    InvalidLevel {
        /// Offending level
        level: u8,
        /// Highest level the field accepts
        max: u8,
    },

    /// Colour channel above the 12-bit range
    #[error("{channel} channel value {value} exceeds 4095")]
    ColorOutOfRange {
        /// Channel name (`red`, `green` or `blue`)
        channel: &'static str,
        /// Offending value
        value: u16,
    },

    /// Payload byte that MIDI cannot carry
    #[error("payload byte {byte:#04x} at offset {offset} is not 7-bit safe")]
    NonMidiByte {
        /// Offset within the payload
        offset: usize,
        /// Offending byte
        byte: u8,
    },

    /// Palette name is empty
    #[error("palette name is empty")]
    EmptyName,

    /// Palette name longer than the firmware limit
    #[error("palette name too long: {len} bytes (max {max})")]
    NameTooLong {
        /// Name length in bytes
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Palette name contains a byte the firmware rejects
    #[error("invalid palette name byte {byte:#04x} at offset {offset}")]
    InvalidNameByte {
        /// Offset within the name
        offset: usize,
        /// Offending byte
        byte: u8,
    },

    /// Buffer does not start with 0xF0 and end with 0xF7
    #[error("not a SysEx frame")]
    NotSysEx,

    /// Manufacturer, device, category or command byte mismatch
    #[error("unexpected header: expected {expected:02x?}, got {found:02x?}")]
    UnexpectedHeader {
        /// Header bytes the response should carry
        expected: [u8; 4],
        /// Header bytes actually received
        found: Vec<u8>,
    },

    /// Frame ended before a required field
    #[error("truncated frame: need {needed} bytes, got {got}")]
    Truncated {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Status byte was neither success nor failure
    #[error("invalid status byte: {value:#04x}")]
    InvalidDiscriminator {
        /// Offending byte
        value: u8,
    },

    /// Failure frame did not carry exactly one error byte
    #[error("malformed failure payload: {len} bytes (expected 1)")]
    MalformedFailure {
        /// Number of bytes after the status byte
        len: usize,
    },

    /// Byte above 0x7F between the start and end markers
    #[error("frame byte {byte:#04x} at offset {offset} is not 7-bit safe")]
    CorruptFrame {
        /// Offset within the frame
        offset: usize,
        /// Offending byte
        byte: u8,
    },

    /// Decoded colour channel above 4095
    #[error("decoded channel value {value} exceeds 4095")]
    ColorOverflow {
        /// Decoded value
        value: u16,
    },

    /// Slot status byte outside the known range
    #[error("invalid slot status byte: {value:#04x}")]
    InvalidStatus {
        /// Offending byte
        value: u8,
    },

    /// Hardware version byte other than 0 or 1
    #[error("invalid hardware version: {value}")]
    InvalidHardwareVersion {
        /// Offending byte
        value: u8,
    },

    /// Response data length does not match the command's layout
    #[error("{command} response payload has {got} bytes (expected {expected})")]
    PayloadLength {
        /// Command the response belongs to
        command: PaletteCommand,
        /// Expected payload length
        expected: usize,
        /// Actual payload length
        got: usize,
    },

    /// Factory slot reported with a non-factory status
    #[error("factory slot {slot} reported as {status}")]
    FactoryStatus {
        /// Write-protected slot
        slot: SlotIndex,
        /// Status the device reported
        status: SlotStatus,
    },

    /// Palette data routed to the wrong slot
    #[error("palette for slot {found} applied to slot {expected}")]
    SlotMismatch {
        /// Slot the data was applied to
        expected: SlotIndex,
        /// Slot the data describes
        found: SlotIndex,
    },
}

/// Broad classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Pre-flight rejection, nothing was sent
    Validation,
    /// Malformed or inconsistent response data
    Format,
}

impl Error {
    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSlot { .. }
            | Self::InvalidTrack { .. }
            | Self::InvalidLevel { .. }
            | Self::ColorOutOfRange { .. }
            | Self::NonMidiByte { .. }
            | Self::EmptyName
            | Self::NameTooLong { .. }
            | Self::InvalidNameByte { .. } => ErrorKind::Validation,
            Self::NotSysEx
            | Self::UnexpectedHeader { .. }
            | Self::Truncated { .. }
            | Self::InvalidDiscriminator { .. }
            | Self::MalformedFailure { .. }
            | Self::CorruptFrame { .. }
            | Self::ColorOverflow { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidHardwareVersion { .. }
            | Self::PayloadLength { .. }
            | Self::FactoryStatus { .. }
            | Self::SlotMismatch { .. } => ErrorKind::Format,
        }
    }

    /// Firmware error the device would report for the same input, if any
    #[must_use]
    pub const fn firmware_equivalent(&self) -> Option<FirmwareError> {
        match self {
            Self::InvalidSlot { .. } => Some(FirmwareError::InvalidSlot),
            Self::InvalidTrack { .. } => Some(FirmwareError::InvalidTrack),
            Self::InvalidLevel { .. } => Some(FirmwareError::InvalidBrightness),
            Self::ColorOutOfRange { .. } => Some(FirmwareError::ValueOutOfRange),
            Self::NameTooLong { .. } => Some(FirmwareError::NameTooLong),
            Self::InvalidNameByte { .. } => Some(FirmwareError::InvalidNameCharacters),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error classification for user-facing handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorCategory {
    /// MIDI device connection or communication failure
    Connection,
    /// SD card read/write failure
    Sd,
    /// Invalid input or parameter
    Validation,
    /// MIDI protocol or firmware version failure
    Protocol,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connection => "connection",
            Self::Sd => "sd",
            Self::Validation => "validation",
            Self::Protocol => "protocol",
        };
        write!(f, "{name}")
    }
}

/// Application error with a user-facing message and retry guidance
///
/// The raw firmware byte is kept in `code` for diagnostics only; `message`
/// is what gets shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{message}")]
pub struct AppError {
    /// Human-readable message
    pub message: String,
    /// Classification for UI handling
    pub category: ErrorCategory,
    /// Raw firmware error byte, if the error maps to one
    pub code: Option<u8>,
    /// Whether retrying makes sense
    pub recoverable: bool,
}

impl AppError {
    /// Build an error from its parts
    pub fn new(
        message: impl Into<String>,
        category: ErrorCategory,
        code: Option<u8>,
        recoverable: bool,
    ) -> Self {
        Self {
            message: message.into(),
            category,
            code,
            recoverable,
        }
    }

    /// Map a firmware error byte, preserving the raw code
    #[must_use]
    pub fn from_firmware(code: u8) -> Self {
        super::error_table::lookup(code).with_code(code)
    }

    /// Error for a write aimed at a factory slot, identical to firmware code 0x08
    #[must_use]
    pub fn write_protected() -> Self {
        Self::from_firmware(FirmwareError::FactoryProtected.code())
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        if let Some(firmware) = err.firmware_equivalent() {
            return Self::from_firmware(firmware.code());
        }
        match err.kind() {
            ErrorKind::Validation => match err {
                Error::EmptyName => Self::new(
                    "Palette name cannot be empty",
                    ErrorCategory::Validation,
                    None,
                    true,
                ),
                _ => Self::new(
                    "Request contains data the device cannot accept",
                    ErrorCategory::Validation,
                    None,
                    false,
                ),
            },
            ErrorKind::Format => Self::new(
                "Unexpected response from device",
                ErrorCategory::Protocol,
                None,
                false,
            ),
        }
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        let message = match err {
            TransportError::Timeout { .. } => "Device did not respond. Check the MIDI connection.",
            TransportError::Disconnected => "Device is not connected",
            TransportError::Io(_) => "Failed to communicate with device",
        };
        Self::new(message, ErrorCategory::Connection, None, true)
    }
}
