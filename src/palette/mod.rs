//! Palette data model and the host-side slot cache

mod data;
mod model;

pub use data::{
    BUTTON_LEVELS, HardwareVersion, INFO_PAYLOAD_SIZE, LED_CONTEXTS, LedAddress, LedField,
    PALETTE_PAYLOAD_SIZE, Palette, SlotInfo, TRACK_COUNT,
};
pub use model::PaletteModel;
