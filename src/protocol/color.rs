//! 12-bit RGB colours and their SysEx representation
//!
//! Each channel travels as two 7-bit bytes, high 5 bits first. The
//! hardware orders channels R, B, G on the wire.

use super::{Error, Result};

/// Maximum value of a 12-bit channel
pub const CHANNEL_MAX: u16 = 0x0FFF;

/// Encoded size of one colour in bytes
pub const COLOR_WIRE_SIZE: usize = 6;

/// 12-bit per channel RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb12 {
    /// Red channel, 0-4095
    pub r: u16,
    /// Green channel, 0-4095
    pub g: u16,
    /// Blue channel, 0-4095
    pub b: u16,
}

impl Rgb12 {
    /// All channels off
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a colour without range checks; [`Rgb12::validate`] runs on encode
    #[must_use]
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Verify every channel fits in 12 bits
    pub fn validate(&self) -> Result<()> {
        for (channel, value) in [("red", self.r), ("green", self.g), ("blue", self.b)] {
            if value > CHANNEL_MAX {
                return Err(Error::ColorOutOfRange { channel, value });
            }
        }
        Ok(())
    }

    /// Encode to wire bytes in R, B, G order
    ///
    /// Out-of-range channels are rejected rather than clamped so the host
    /// never believes in a colour the device does not show.
    pub fn encode(&self) -> Result<[u8; COLOR_WIRE_SIZE]> {
        self.validate()?;

        let mut bytes = [0u8; COLOR_WIRE_SIZE];
        for (pair, value) in bytes.chunks_exact_mut(2).zip([self.r, self.b, self.g]) {
            pair[0] = (value >> 7) as u8;
            pair[1] = (value & 0x7F) as u8;
        }
        Ok(bytes)
    }

    /// Encode and append to a payload buffer
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.encode()?);
        Ok(())
    }

    /// Decode from wire bytes in R, B, G order
    ///
    /// Reads the first six bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let Some(bytes) = bytes.get(..COLOR_WIRE_SIZE) else {
            return Err(Error::Truncated {
                needed: COLOR_WIRE_SIZE,
                got: bytes.len(),
            });
        };

        let mut channels = [0u16; 3];
        for (index, (channel, pair)) in channels
            .iter_mut()
            .zip(bytes.chunks_exact(2))
            .enumerate()
        {
            *channel = decode_channel(index * 2, pair[0], pair[1])?;
        }
        let [r, b, g] = channels;
        Ok(Self { r, g, b })
    }
}

/// `offset` is the position of `high` within the colour's six bytes
fn decode_channel(offset: usize, high: u8, low: u8) -> Result<u16> {
    if high > 0x7F {
        return Err(Error::CorruptFrame { offset, byte: high });
    }
    if low > 0x7F {
        return Err(Error::CorruptFrame {
            offset: offset + 1,
            byte: low,
        });
    }
    let value = (u16::from(high) << 7) | u16::from(low);
    if value > CHANNEL_MAX {
        return Err(Error::ColorOverflow { value });
    }
    Ok(value)
}
