//! Palette contents and device slot info
//!
//! # Query payload
//!
//! ```text
//! [slot] [status] [24 colours x 6 bytes]
//! ```
//!
//! Colours run SMD normal tracks 0-3, SMD dim 0-3, SMD medium 0-3, then
//! buttons track-major (track 0 levels 0, 1, 2, track 1 ...).
//!
//! # Info payload
//!
//! ```text
//! [active slot] [hardware version] [status x 8]
//! ```

use std::fmt;

use crate::protocol::{
    COLOR_WIRE_SIZE, Error, PaletteCommand, Result, Rgb12, SLOT_COUNT, SlotIndex, SlotStatus,
};

/// Number of tracks
pub const TRACK_COUNT: usize = 4;

/// Brightness levels per button LED
pub const BUTTON_LEVELS: usize = 3;

/// LED contexts per palette
pub const LED_CONTEXTS: usize = 3 * TRACK_COUNT + TRACK_COUNT * BUTTON_LEVELS;

/// Query response payload size
pub const PALETTE_PAYLOAD_SIZE: usize = 2 + LED_CONTEXTS * COLOR_WIRE_SIZE;

/// Info response payload size
pub const INFO_PAYLOAD_SIZE: usize = 2 + SLOT_COUNT;

/// Addressable LED group within a palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum LedField {
    /// Track SMD LEDs at normal brightness
    TrackSmd = 0x00,
    /// Track SMD LEDs at dim brightness
    TrackSmdDim = 0x01,
    /// Track SMD LEDs at medium brightness
    TrackSmdMedium = 0x02,
    /// Track RGB buttons, three brightness levels each
    TrackButton = 0x03,
}

impl LedField {
    /// Wire field ID
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Number of brightness levels addressable in this field
    #[must_use]
    pub const fn levels(self) -> u8 {
        match self {
            Self::TrackButton => BUTTON_LEVELS as u8,
            _ => 1,
        }
    }
}

impl fmt::Display for LedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TrackSmd => "track_smd",
            Self::TrackSmdDim => "track_smd_dim",
            Self::TrackSmdMedium => "track_smd_medium",
            Self::TrackButton => "track_btn",
        };
        write!(f, "{name}")
    }
}

/// One LED context: field, track and brightness level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedAddress {
    field: LedField,
    track: u8,
    level: u8,
}

impl LedAddress {
    /// Create an address, checking track and level against the field
    pub fn new(field: LedField, track: u8, level: u8) -> Result<Self> {
        if usize::from(track) >= TRACK_COUNT {
            return Err(Error::InvalidTrack { track });
        }
        if level >= field.levels() {
            return Err(Error::InvalidLevel {
                level,
                max: field.levels() - 1,
            });
        }
        Ok(Self {
            field,
            track,
            level,
        })
    }

    /// LED field
    #[must_use]
    pub const fn field(self) -> LedField {
        self.field
    }

    /// Track index, 0-3
    #[must_use]
    pub const fn track(self) -> u8 {
        self.track
    }

    /// Brightness level, 0 for SMD fields
    #[must_use]
    pub const fn level(self) -> u8 {
        self.level
    }

    /// Wire bytes: field, track, level
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.field.as_u8(), self.track, self.level]
    }
}

/// Full LED configuration of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    slot: SlotIndex,
    /// Slot status at the time of the query
    pub status: SlotStatus,
    /// Normal brightness SMD LEDs per track
    pub track_smd: [Rgb12; TRACK_COUNT],
    /// Dim brightness SMD LEDs per track
    pub track_smd_dim: [Rgb12; TRACK_COUNT],
    /// Medium brightness SMD LEDs per track
    pub track_smd_medium: [Rgb12; TRACK_COUNT],
    /// Button LEDs, indexed `[track][level]`
    pub track_btn: [[Rgb12; BUTTON_LEVELS]; TRACK_COUNT],
}

impl Palette {
    /// All-black palette for a slot
    #[must_use]
    pub fn new(slot: SlotIndex, status: SlotStatus) -> Self {
        Self {
            slot,
            status,
            track_smd: [Rgb12::BLACK; TRACK_COUNT],
            track_smd_dim: [Rgb12::BLACK; TRACK_COUNT],
            track_smd_medium: [Rgb12::BLACK; TRACK_COUNT],
            track_btn: [[Rgb12::BLACK; BUTTON_LEVELS]; TRACK_COUNT],
        }
    }

    /// Slot this palette belongs to
    #[must_use]
    pub const fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// Colour at one LED context
    #[must_use]
    pub fn color(&self, address: LedAddress) -> Rgb12 {
        let track = usize::from(address.track);
        match address.field {
            LedField::TrackSmd => self.track_smd[track],
            LedField::TrackSmdDim => self.track_smd_dim[track],
            LedField::TrackSmdMedium => self.track_smd_medium[track],
            LedField::TrackButton => self.track_btn[track][usize::from(address.level)],
        }
    }

    /// Replace the colour at one LED context
    pub fn set_color(&mut self, address: LedAddress, color: Rgb12) {
        let track = usize::from(address.track);
        let target = match address.field {
            LedField::TrackSmd => &mut self.track_smd[track],
            LedField::TrackSmdDim => &mut self.track_smd_dim[track],
            LedField::TrackSmdMedium => &mut self.track_smd_medium[track],
            LedField::TrackButton => &mut self.track_btn[track][usize::from(address.level)],
        };
        *target = color;
    }

    /// All 24 colours in wire order
    pub fn colors(&self) -> impl Iterator<Item = &Rgb12> {
        self.track_smd
            .iter()
            .chain(&self.track_smd_dim)
            .chain(&self.track_smd_medium)
            .chain(self.track_btn.iter().flatten())
    }

    fn colors_mut(&mut self) -> impl Iterator<Item = &mut Rgb12> {
        self.track_smd
            .iter_mut()
            .chain(&mut self.track_smd_dim)
            .chain(&mut self.track_smd_medium)
            .chain(self.track_btn.iter_mut().flatten())
    }

    /// Parse a query response payload
    pub fn from_payload(data: &[u8]) -> Result<Self> {
        if data.len() != PALETTE_PAYLOAD_SIZE {
            return Err(Error::PayloadLength {
                command: PaletteCommand::Query,
                expected: PALETTE_PAYLOAD_SIZE,
                got: data.len(),
            });
        }

        let slot = SlotIndex::new(data[0])?;
        let status = parse_status(data[1])?;
        check_factory(slot, status)?;
        let mut palette = Self::new(slot, status);
        for (color, chunk) in palette
            .colors_mut()
            .zip(data[2..].chunks_exact(COLOR_WIRE_SIZE))
        {
            *color = Rgb12::decode(chunk)?;
        }
        Ok(palette)
    }

    /// Encode as a query response payload
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(PALETTE_PAYLOAD_SIZE);
        out.push(self.slot.get());
        out.push(self.status.as_u8());
        for color in self.colors() {
            color.encode_into(&mut out)?;
        }
        Ok(out)
    }
}

/// Hardware revision reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum HardwareVersion {
    /// First hardware revision
    V0 = 0,
    /// Second hardware revision
    V1 = 1,
}

impl HardwareVersion {
    /// Convert from the wire byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::V0),
            1 => Some(Self::V1),
            _ => None,
        }
    }

    /// Convert to the wire byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Device-reported snapshot of slot state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotInfo {
    /// Currently active slot
    pub active_slot: SlotIndex,
    /// Hardware revision
    pub hw_version: HardwareVersion,
    /// Status per slot, index-aligned
    pub slot_status: [SlotStatus; SLOT_COUNT],
}

impl SlotInfo {
    /// Status of one slot
    #[must_use]
    pub const fn status(&self, slot: SlotIndex) -> SlotStatus {
        self.slot_status[slot.as_usize()]
    }

    /// Parse an info response payload
    pub fn from_payload(data: &[u8]) -> Result<Self> {
        if data.len() != INFO_PAYLOAD_SIZE {
            return Err(Error::PayloadLength {
                command: PaletteCommand::Info,
                expected: INFO_PAYLOAD_SIZE,
                got: data.len(),
            });
        }

        let active_slot = SlotIndex::new(data[0])?;
        let hw_version = HardwareVersion::from_u8(data[1])
            .ok_or(Error::InvalidHardwareVersion { value: data[1] })?;
        let mut slot_status = [SlotStatus::Empty; SLOT_COUNT];
        for (status, byte) in slot_status.iter_mut().zip(&data[2..]) {
            *status = parse_status(*byte)?;
        }
        for slot in SlotIndex::all().filter(|slot| slot.is_write_protected()) {
            check_factory(slot, slot_status[slot.as_usize()])?;
        }

        Ok(Self {
            active_slot,
            hw_version,
            slot_status,
        })
    }

    /// Encode as an info response payload
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(INFO_PAYLOAD_SIZE);
        out.push(self.active_slot.get());
        out.push(self.hw_version.as_u8());
        out.extend(self.slot_status.iter().map(|status| status.as_u8()));
        out
    }
}

fn parse_status(byte: u8) -> Result<SlotStatus> {
    SlotStatus::from_u8(byte).ok_or(Error::InvalidStatus { value: byte })
}

/// Slots 0 and 1 always hold the factory palettes
pub(crate) fn check_factory(slot: SlotIndex, status: SlotStatus) -> Result<()> {
    if slot.is_write_protected() && status != SlotStatus::Factory {
        return Err(Error::FactoryStatus { slot, status });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(n: u8) -> SlotIndex {
        SlotIndex::new(n).unwrap()
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(LED_CONTEXTS, 24);
        assert_eq!(PALETTE_PAYLOAD_SIZE, 146);
        assert_eq!(INFO_PAYLOAD_SIZE, 10);
    }

    #[test]
    fn test_led_address_bounds() {
        assert!(LedAddress::new(LedField::TrackButton, 3, 2).is_ok());
        assert_eq!(
            LedAddress::new(LedField::TrackSmd, 4, 0),
            Err(Error::InvalidTrack { track: 4 })
        );
        assert_eq!(
            LedAddress::new(LedField::TrackSmdDim, 0, 1),
            Err(Error::InvalidLevel { level: 1, max: 0 })
        );
        assert_eq!(
            LedAddress::new(LedField::TrackButton, 0, 3),
            Err(Error::InvalidLevel { level: 3, max: 2 })
        );
    }

    #[test]
    fn test_set_and_get_color() {
        let mut palette = Palette::new(slot(2), SlotStatus::UserLoaded);
        let address = LedAddress::new(LedField::TrackButton, 1, 2).unwrap();
        palette.set_color(address, Rgb12::new(4095, 0, 2048));

        assert_eq!(palette.color(address), Rgb12::new(4095, 0, 2048));
        assert_eq!(palette.track_btn[1][2], Rgb12::new(4095, 0, 2048));
        assert_eq!(palette.colors().count(), LED_CONTEXTS);
    }

    #[test]
    fn test_palette_payload_order() {
        let mut palette = Palette::new(slot(3), SlotStatus::UserModified);
        palette.track_smd_dim[0] = Rgb12::new(1, 0, 0);
        palette.track_btn[0][1] = Rgb12::new(2, 0, 0);

        let payload = palette.to_payload().unwrap();
        assert_eq!(payload.len(), PALETTE_PAYLOAD_SIZE);
        assert_eq!(&payload[..2], &[3, 0x03]);
        // SMD dim track 0 is the fifth colour
        assert_eq!(&payload[2 + 4 * 6..2 + 5 * 6], &[0, 1, 0, 0, 0, 0]);
        // Button track 0 level 1 is the fourteenth colour
        assert_eq!(&payload[2 + 13 * 6..2 + 14 * 6], &[0, 2, 0, 0, 0, 0]);

        assert_eq!(Palette::from_payload(&payload).unwrap(), palette);
    }

    #[test]
    fn test_palette_payload_errors() {
        assert!(matches!(
            Palette::from_payload(&[0x02, 0x01]),
            Err(Error::PayloadLength { got: 2, .. })
        ));

        let mut payload = Palette::new(slot(0), SlotStatus::Factory)
            .to_payload()
            .unwrap();
        payload[0] = 9;
        assert_eq!(
            Palette::from_payload(&payload),
            Err(Error::InvalidSlot { slot: 9 })
        );

        payload[0] = 0;
        payload[1] = 7;
        assert_eq!(
            Palette::from_payload(&payload),
            Err(Error::InvalidStatus { value: 7 })
        );

        payload[1] = 1;
        payload[2] = 0x20;
        assert_eq!(
            Palette::from_payload(&payload),
            Err(Error::ColorOverflow { value: 4096 })
        );
    }

    #[test]
    fn test_slot_info_payload() {
        let data = [4, 1, 1, 1, 2, 0, 3, 0, 0, 2];
        let info = SlotInfo::from_payload(&data).unwrap();

        assert_eq!(info.active_slot, slot(4));
        assert_eq!(info.hw_version, HardwareVersion::V1);
        assert_eq!(info.status(slot(0)), SlotStatus::Factory);
        assert_eq!(info.status(slot(4)), SlotStatus::UserModified);
        assert_eq!(info.status(slot(7)), SlotStatus::UserLoaded);
        assert_eq!(info.to_payload(), data.to_vec());
    }

    #[test]
    fn test_factory_slots_must_report_factory() {
        let mut payload = Palette::new(slot(0), SlotStatus::Factory)
            .to_payload()
            .unwrap();
        payload[1] = SlotStatus::UserModified.as_u8();
        assert_eq!(
            Palette::from_payload(&payload),
            Err(Error::FactoryStatus {
                slot: slot(0),
                status: SlotStatus::UserModified
            })
        );

        assert_eq!(
            SlotInfo::from_payload(&[2, 0, 0, 3, 0, 0, 0, 0, 0, 0]),
            Err(Error::FactoryStatus {
                slot: slot(0),
                status: SlotStatus::Empty
            })
        );
        assert_eq!(
            SlotInfo::from_payload(&[2, 0, 1, 2, 0, 0, 0, 0, 0, 0]),
            Err(Error::FactoryStatus {
                slot: slot(1),
                status: SlotStatus::UserLoaded
            })
        );
    }

    #[test]
    fn test_slot_info_errors() {
        assert!(matches!(
            SlotInfo::from_payload(&[0, 0, 1]),
            Err(Error::PayloadLength { expected: 10, .. })
        ));
        assert_eq!(
            SlotInfo::from_payload(&[0, 2, 1, 1, 0, 0, 0, 0, 0, 0]),
            Err(Error::InvalidHardwareVersion { value: 2 })
        );
        assert_eq!(
            SlotInfo::from_payload(&[8, 0, 1, 1, 0, 0, 0, 0, 0, 0]),
            Err(Error::InvalidSlot { slot: 8 })
        );
    }
}
