//! Palette command codes, slot indices and slot status

use std::fmt;

use super::{Error, Result, SLOT_COUNT};

/// Palette command codes carried in byte 4 of every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PaletteCommand {
    /// Query device info and slot status
    Info = 0x01,
    /// Read palette data from a slot
    Query = 0x02,
    /// Update one LED colour in real time (not persisted)
    SetRgb = 0x03,
    /// Save palette to SD card
    Save = 0x04,
    /// Load palette from SD card
    Load = 0x05,
    /// Delete palette from SD card
    Delete = 0x06,
    /// Rename palette on SD card
    Rename = 0x07,
    /// Copy palette to another slot
    Copy = 0x08,
    /// Reset slot to factory default
    Reset = 0x09,
}

impl PaletteCommand {
    /// All commands in code order
    pub const ALL: [Self; 9] = [
        Self::Info,
        Self::Query,
        Self::SetRgb,
        Self::Save,
        Self::Load,
        Self::Delete,
        Self::Rename,
        Self::Copy,
        Self::Reset,
    ];

    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Info),
            0x02 => Some(Self::Query),
            0x03 => Some(Self::SetRgb),
            0x04 => Some(Self::Save),
            0x05 => Some(Self::Load),
            0x06 => Some(Self::Delete),
            0x07 => Some(Self::Rename),
            0x08 => Some(Self::Copy),
            0x09 => Some(Self::Reset),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PaletteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "PALETTE_INFO",
            Self::Query => "PALETTE_QUERY",
            Self::SetRgb => "PALETTE_SET_RGB",
            Self::Save => "PALETTE_SAVE",
            Self::Load => "PALETTE_LOAD",
            Self::Delete => "PALETTE_DELETE",
            Self::Rename => "PALETTE_RENAME",
            Self::Copy => "PALETTE_COPY",
            Self::Reset => "PALETTE_RESET",
        };
        write!(f, "{name}")
    }
}

/// Palette slot index, always in `0..8`
///
/// Wire bytes carry no range guarantee, so the bound is checked when the
/// index is constructed rather than wherever it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Number of factory write-protected slots at the start of the range
    pub const FACTORY_SLOTS: u8 = 2;

    /// Create a slot index, rejecting values outside `0..8`
    pub fn new(value: u8) -> Result<Self> {
        if usize::from(value) < SLOT_COUNT {
            Ok(Self(value))
        } else {
            Err(Error::InvalidSlot { slot: value })
        }
    }

    /// Iterate over every slot in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOT_COUNT as u8).map(Self)
    }

    /// Raw slot number
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Slot number as an array index
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Factory slots 0 and 1 cannot be written from the host
    #[must_use]
    pub const fn is_write_protected(self) -> bool {
        self.0 < Self::FACTORY_SLOTS
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SlotIndex> for u8 {
    fn from(slot: SlotIndex) -> Self {
        slot.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a palette slot as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum SlotStatus {
    /// No palette saved in slot
    #[default]
    Empty = 0x00,
    /// Factory preset
    Factory = 0x01,
    /// User palette loaded from SD card
    UserLoaded = 0x02,
    /// User palette modified in memory, unsaved
    UserModified = 0x03,
}

impl SlotStatus {
    /// Convert from the wire status byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Empty),
            0x01 => Some(Self::Factory),
            0x02 => Some(Self::UserLoaded),
            0x03 => Some(Self::UserModified),
            _ => None,
        }
    }

    /// Convert to the wire status byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Factory => "factory",
            Self::UserLoaded => "user_loaded",
            Self::UserModified => "user_modified",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_roundtrip() {
        for command in PaletteCommand::ALL {
            let byte = command.as_u8();
            assert_eq!(PaletteCommand::from_u8(byte), Some(command));
        }
        assert_eq!(PaletteCommand::from_u8(0x00), None);
        assert_eq!(PaletteCommand::from_u8(0x0A), None);
    }

    #[test]
    fn test_command_codes_are_fixed() {
        assert_eq!(PaletteCommand::Info.as_u8(), 0x01);
        assert_eq!(PaletteCommand::SetRgb.as_u8(), 0x03);
        assert_eq!(PaletteCommand::Reset.as_u8(), 0x09);
        assert_eq!(PaletteCommand::Rename.to_string(), "PALETTE_RENAME");
    }

    #[test]
    fn test_slot_index_bounds() {
        assert_eq!(SlotIndex::new(7).unwrap().get(), 7);
        assert!(matches!(
            SlotIndex::new(8),
            Err(Error::InvalidSlot { slot: 8 })
        ));
        assert_eq!(SlotIndex::all().count(), 8);
    }

    #[test]
    fn test_write_protection() {
        let protected: Vec<u8> = SlotIndex::all()
            .filter(|slot| slot.is_write_protected())
            .map(SlotIndex::get)
            .collect();
        assert_eq!(protected, vec![0, 1]);
    }

    #[test]
    fn test_slot_status_bytes() {
        assert_eq!(SlotStatus::from_u8(2), Some(SlotStatus::UserLoaded));
        assert_eq!(SlotStatus::from_u8(4), None);
        assert_eq!(SlotStatus::UserModified.to_string(), "user_modified");
    }
}
