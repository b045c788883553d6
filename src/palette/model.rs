//! In-memory mirror of the device's palette slots

use tracing::debug;

use super::data::check_factory;
use super::{Palette, SlotInfo};
use crate::protocol::{Error, Result, SLOT_COUNT, SlotIndex};

/// Last-known slot info and cached palettes
///
/// Readers always get copies, so a cached palette can only change through
/// the apply/invalidate operations below.
#[derive(Debug, Clone, Default)]
pub struct PaletteModel {
    info: Option<SlotInfo>,
    palettes: [Option<Palette>; SLOT_COUNT],
}

impl PaletteModel {
    /// Empty model, nothing known yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot info snapshot wholesale
    pub fn apply_info(&mut self, info: SlotInfo) {
        debug!(active_slot = %info.active_slot, "slot info updated");
        self.info = Some(info);
    }

    /// Cache one slot's palette
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotMismatch`] when the palette describes a different
    /// slot than `slot`, and [`Error::FactoryStatus`] when a factory slot
    /// carries any other status. The cache is left untouched in both cases.
    pub fn apply_palette(&mut self, slot: SlotIndex, palette: Palette) -> Result<()> {
        if palette.slot() != slot {
            return Err(Error::SlotMismatch {
                expected: slot,
                found: palette.slot(),
            });
        }
        check_factory(slot, palette.status)?;
        debug!(%slot, status = %palette.status, "palette cached");
        self.palettes[slot.as_usize()] = Some(palette);
        Ok(())
    }

    /// Drop any cached palette for `slot`, leaving slot info alone
    pub fn invalidate(&mut self, slot: SlotIndex) {
        if self.palettes[slot.as_usize()].take().is_some() {
            debug!(%slot, "palette cache invalidated");
        }
    }

    /// Forget everything, as after a reconnect
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Factory slots 0 and 1 are write-protected
    #[must_use]
    pub const fn is_write_protected(slot: SlotIndex) -> bool {
        slot.is_write_protected()
    }

    /// Copy of the last slot info, if any
    #[must_use]
    pub fn slot_info(&self) -> Option<SlotInfo> {
        self.info
    }

    /// Copy of the cached palette for `slot`, if any
    #[must_use]
    pub fn palette(&self, slot: SlotIndex) -> Option<Palette> {
        self.palettes[slot.as_usize()]
    }

    /// Slots with a cached palette
    pub fn cached_slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        SlotIndex::all().filter(|slot| self.palettes[slot.as_usize()].is_some())
    }
}
