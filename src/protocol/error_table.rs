//! Firmware error codes and their user-facing descriptors
//!
//! The firmware reports failures as a single byte. Codes 0x01-0x08 are
//! parameter validation failures, 0x10-0x16 cover SD card, name and
//! hardware checks. 0x12 and 0x13 sit in the SD range but are name
//! validation failures.

use std::fmt;

use super::{AppError, ErrorCategory};

/// Error codes defined by the device firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FirmwareError {
    /// Slot number outside 0-7
    InvalidSlot = 0x01,
    /// Unknown LED field
    InvalidField = 0x02,
    /// Track index outside 0-3
    InvalidTrack = 0x03,
    /// Brightness level invalid for the field
    InvalidBrightness = 0x04,
    /// Colour channel selector invalid
    InvalidChannel = 0x05,
    /// Colour value above 4095
    ValueOutOfRange = 0x06,
    /// Operation needs a populated slot
    SlotEmpty = 0x07,
    /// Write aimed at factory slot 0 or 1
    FactoryProtected = 0x08,
    /// SD card missing or not initialised
    SdNotReady = 0x10,
    /// SD card write failed
    SdWriteFailed = 0x11,
    /// Palette name longer than 32 characters
    NameTooLong = 0x12,
    /// Palette name contains unsupported characters
    InvalidNameCharacters = 0x13,
    /// Palette file missing on SD card
    FileNotFound = 0x14,
    /// Palette file failed integrity checks
    FileCorrupted = 0x15,
    /// Palette data written for a different hardware revision
    HardwareMismatch = 0x16,
}

/// User-facing description of an error, without the raw code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDescriptor {
    /// Human-readable message
    pub message: &'static str,
    /// Classification for UI handling
    pub category: ErrorCategory,
    /// Whether retrying makes sense
    pub recoverable: bool,
}

impl ErrorDescriptor {
    const fn new(message: &'static str, category: ErrorCategory, recoverable: bool) -> Self {
        Self {
            message,
            category,
            recoverable,
        }
    }

    /// Attach a raw firmware code
    #[must_use]
    pub fn with_code(self, code: u8) -> AppError {
        AppError::new(self.message, self.category, Some(code), self.recoverable)
    }
}

/// Descriptor returned for bytes outside the firmware table
pub const UNKNOWN_ERROR: ErrorDescriptor =
    ErrorDescriptor::new("Unknown device error", ErrorCategory::Protocol, false);

impl FirmwareError {
    /// Every firmware code in ascending order
    pub const ALL: [Self; 15] = [
        Self::InvalidSlot,
        Self::InvalidField,
        Self::InvalidTrack,
        Self::InvalidBrightness,
        Self::InvalidChannel,
        Self::ValueOutOfRange,
        Self::SlotEmpty,
        Self::FactoryProtected,
        Self::SdNotReady,
        Self::SdWriteFailed,
        Self::NameTooLong,
        Self::InvalidNameCharacters,
        Self::FileNotFound,
        Self::FileCorrupted,
        Self::HardwareMismatch,
    ];

    /// Convert from the wire error byte
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::InvalidSlot),
            0x02 => Some(Self::InvalidField),
            0x03 => Some(Self::InvalidTrack),
            0x04 => Some(Self::InvalidBrightness),
            0x05 => Some(Self::InvalidChannel),
            0x06 => Some(Self::ValueOutOfRange),
            0x07 => Some(Self::SlotEmpty),
            0x08 => Some(Self::FactoryProtected),
            0x10 => Some(Self::SdNotReady),
            0x11 => Some(Self::SdWriteFailed),
            0x12 => Some(Self::NameTooLong),
            0x13 => Some(Self::InvalidNameCharacters),
            0x14 => Some(Self::FileNotFound),
            0x15 => Some(Self::FileCorrupted),
            0x16 => Some(Self::HardwareMismatch),
            _ => None,
        }
    }

    /// Convert to the wire error byte
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// User-facing descriptor for this code
    #[must_use]
    pub const fn descriptor(self) -> ErrorDescriptor {
        use ErrorCategory::{Protocol, Sd, Validation};

        match self {
            Self::InvalidSlot => ErrorDescriptor::new("Invalid slot number", Validation, false),
            Self::InvalidField => ErrorDescriptor::new("Invalid field ID", Validation, false),
            Self::InvalidTrack => ErrorDescriptor::new("Invalid track index", Validation, false),
            Self::InvalidBrightness => {
                ErrorDescriptor::new("Invalid brightness index", Validation, false)
            }
            Self::InvalidChannel => ErrorDescriptor::new("Invalid channel", Validation, false),
            Self::ValueOutOfRange => ErrorDescriptor::new("Value out of range", Validation, false),
            Self::SlotEmpty => ErrorDescriptor::new("Slot is empty", Validation, true),
            Self::FactoryProtected => {
                ErrorDescriptor::new("Cannot modify factory palette", Validation, false)
            }
            Self::SdNotReady => {
                ErrorDescriptor::new("SD card not ready. Check card is inserted.", Sd, true)
            }
            Self::SdWriteFailed => ErrorDescriptor::new("Failed to write to SD card", Sd, true),
            Self::NameTooLong => ErrorDescriptor::new(
                "Palette name too long (max 32 characters)",
                Validation,
                true,
            ),
            Self::InvalidNameCharacters => {
                ErrorDescriptor::new("Invalid characters in palette name", Validation, true)
            }
            Self::FileNotFound => ErrorDescriptor::new("Palette file not found", Sd, true),
            Self::FileCorrupted => ErrorDescriptor::new("Palette file is corrupted", Sd, false),
            Self::HardwareMismatch => {
                ErrorDescriptor::new("Hardware version mismatch", Protocol, false)
            }
        }
    }
}

impl fmt::Display for FirmwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.descriptor().message, self.code())
    }
}

/// Look up the descriptor for a raw firmware error byte
#[must_use]
pub fn lookup(code: u8) -> ErrorDescriptor {
    FirmwareError::from_code(code).map_or(UNKNOWN_ERROR, FirmwareError::descriptor)
}
