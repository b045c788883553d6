//! SysEx frame codec (encode/decode)
//!
//! # Format
//!
//! ```text
//! F0 77 01 41 <cmd> [payload...] F7               request
//! F0 77 01 41 <cmd> 01 [data...] F7               success response
//! F0 77 01 41 <cmd> 00 <error code> F7            failure response
//! ```
//!
//! Every byte between the markers must be 7-bit safe.

use bytes::Bytes;
use tracing::{trace, warn};

use super::{
    DEVICE_ID, Error, HEADER_SIZE, MANUFACTURER_ID, MIN_RESPONSE_SIZE, PALETTE_CATEGORY,
    PaletteCommand, Result, STATUS_FAILURE, STATUS_SUCCESS, SYSEX_END, SYSEX_START, SysExResponse,
};

/// Header bytes following 0xF0 for a given command
#[must_use]
pub const fn header(command: PaletteCommand) -> [u8; 4] {
    [
        MANUFACTURER_ID,
        DEVICE_ID,
        PALETTE_CATEGORY,
        command.as_u8(),
    ]
}

/// Encode a request frame
///
/// The payload must already be in wire form (slot bytes, encoded colours,
/// name bytes).
///
/// # Errors
///
/// Returns [`Error::NonMidiByte`] if any payload byte is 0x80 or above. MIDI
/// transport silently corrupts such bytes, so nothing is framed.
pub fn encode(command: PaletteCommand, payload: &[u8]) -> Result<Vec<u8>> {
    if let Some(offset) = payload.iter().position(|byte| *byte > 0x7F) {
        return Err(Error::NonMidiByte {
            offset,
            byte: payload[offset],
        });
    }

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len() + 1);
    frame.push(SYSEX_START);
    frame.extend_from_slice(&header(command));
    frame.extend_from_slice(payload);
    frame.push(SYSEX_END);

    trace!(%command, frame = ?HexBytes(&frame), "encoded request");
    Ok(frame)
}

/// Decode a response frame for the command that was sent
///
/// Checks run in order: framing markers, header, 7-bit body, status byte.
/// Any structural violation is returned before payload bytes are
/// interpreted.
///
/// # Errors
///
/// Returns a format error ([`Error::NotSysEx`], [`Error::UnexpectedHeader`],
/// [`Error::Truncated`], [`Error::CorruptFrame`],
/// [`Error::InvalidDiscriminator`], [`Error::MalformedFailure`]) for
/// malformed frames. A well-formed failure frame is not an error here; it
/// decodes to a [`SysExResponse`] carrying the firmware code.
pub fn decode(bytes: Bytes, expected: PaletteCommand) -> Result<SysExResponse> {
    let result = decode_frame(&bytes, expected);
    if let Err(err) = &result {
        warn!(command = %expected, frame = ?HexBytes(&bytes), %err, "rejected response frame");
    }
    result
}

fn decode_frame(bytes: &Bytes, expected: PaletteCommand) -> Result<SysExResponse> {
    if bytes.first() != Some(&SYSEX_START) || bytes.last() != Some(&SYSEX_END) {
        return Err(Error::NotSysEx);
    }

    let body_end = bytes.len() - 1;
    let expected_header = header(expected);
    let found_header = &bytes[1..body_end.min(HEADER_SIZE)];
    if found_header != expected_header {
        return Err(Error::UnexpectedHeader {
            expected: expected_header,
            found: found_header.to_vec(),
        });
    }

    if let Some(offset) = bytes[1..body_end].iter().position(|byte| *byte > 0x7F) {
        return Err(Error::CorruptFrame {
            offset: offset + 1,
            byte: bytes[offset + 1],
        });
    }

    if bytes.len() < MIN_RESPONSE_SIZE {
        return Err(Error::Truncated {
            needed: MIN_RESPONSE_SIZE,
            got: bytes.len(),
        });
    }

    let status = bytes[HEADER_SIZE];
    let data_start = HEADER_SIZE + 1;
    let response = match status {
        STATUS_SUCCESS => SysExResponse::success(expected, bytes.slice(data_start..body_end)),
        STATUS_FAILURE => {
            let len = body_end - data_start;
            if len != 1 {
                return Err(Error::MalformedFailure { len });
            }
            let code = bytes[data_start];
            warn!(command = %expected, code, "device reported error");
            SysExResponse::failure(expected, code)
        }
        value => return Err(Error::InvalidDiscriminator { value }),
    };

    trace!(command = %expected, success = response.is_success(), "decoded response");
    Ok(response)
}

/// Hex formatting for frame dumps in log output
pub(crate) struct HexBytes<'a>(pub(crate) &'a [u8]);

impl std::fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
