//! High-level palette operations over a [`MidiTransport`]
//!
//! Each operation is checked locally, framed, exchanged with the device and
//! its result applied to the [`PaletteModel`]. Nothing is added to the model
//! unless a well-formed success response arrives; a write with an unknown
//! outcome only drops the target slot's cached palette.

use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, instrument, warn};

use crate::palette::{LedAddress, Palette, PaletteModel, SlotInfo};
use crate::protocol::metrics::{ExchangeOutcome, Metrics};
use crate::protocol::{
    self, AppError, Error, HexBytes, MAX_NAME_LEN, PaletteCommand, Result, Rgb12, SlotIndex,
    SysExResponse,
};
use crate::transport::{MidiTransport, TransportConfig};

/// A palette operation and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Read active slot, hardware version and slot status
    Info,
    /// Read one slot's palette
    Query {
        /// Slot to read
        slot: SlotIndex,
    },
    /// Change one LED colour in real time
    SetRgb {
        /// Slot being edited
        slot: SlotIndex,
        /// LED context to change
        address: LedAddress,
        /// New colour
        color: Rgb12,
    },
    /// Persist a slot to SD card
    Save {
        /// Slot to save
        slot: SlotIndex,
    },
    /// Load a slot from SD card
    Load {
        /// Slot to load
        slot: SlotIndex,
    },
    /// Delete a slot's palette from SD card
    Delete {
        /// Slot to delete
        slot: SlotIndex,
    },
    /// Rename a slot's palette on SD card
    Rename {
        /// Slot to rename
        slot: SlotIndex,
        /// New name, ASCII, at most 32 bytes
        name: String,
    },
    /// Copy one slot over another
    Copy {
        /// Slot to copy from
        source: SlotIndex,
        /// Slot to overwrite
        dest: SlotIndex,
    },
    /// Reset a slot to its factory default
    Reset {
        /// Slot to reset
        slot: SlotIndex,
    },
}

impl Operation {
    /// Command code sent for this operation
    #[must_use]
    pub const fn command(&self) -> PaletteCommand {
        match self {
            Self::Info => PaletteCommand::Info,
            Self::Query { .. } => PaletteCommand::Query,
            Self::SetRgb { .. } => PaletteCommand::SetRgb,
            Self::Save { .. } => PaletteCommand::Save,
            Self::Load { .. } => PaletteCommand::Load,
            Self::Delete { .. } => PaletteCommand::Delete,
            Self::Rename { .. } => PaletteCommand::Rename,
            Self::Copy { .. } => PaletteCommand::Copy,
            Self::Reset { .. } => PaletteCommand::Reset,
        }
    }

    /// Slot whose contents the operation changes on success
    #[must_use]
    pub const fn affected_slot(&self) -> Option<SlotIndex> {
        match self {
            Self::Info | Self::Query { .. } => None,
            Self::Copy { dest, .. } => Some(*dest),
            Self::SetRgb { slot, .. }
            | Self::Save { slot }
            | Self::Load { slot }
            | Self::Delete { slot }
            | Self::Rename { slot, .. }
            | Self::Reset { slot } => Some(*slot),
        }
    }

    /// Write-protected slot this operation would overwrite, if any
    #[must_use]
    pub const fn protected_target(&self) -> Option<SlotIndex> {
        let slot = match self {
            Self::Save { slot }
            | Self::Delete { slot }
            | Self::Rename { slot, .. }
            | Self::Reset { slot } => *slot,
            Self::Copy { dest, .. } => *dest,
            Self::Info | Self::Query { .. } | Self::SetRgb { .. } | Self::Load { .. } => {
                return None;
            }
        };
        if slot.is_write_protected() {
            Some(slot)
        } else {
            None
        }
    }

    /// Command-specific payload in wire form
    pub fn payload(&self) -> Result<Vec<u8>> {
        let payload = match self {
            Self::Info => Vec::new(),
            Self::Query { slot }
            | Self::Save { slot }
            | Self::Load { slot }
            | Self::Delete { slot }
            | Self::Reset { slot } => vec![slot.get()],
            Self::SetRgb {
                slot,
                address,
                color,
            } => {
                let mut payload = Vec::with_capacity(10);
                payload.push(slot.get());
                payload.extend_from_slice(&address.to_bytes());
                color.encode_into(&mut payload)?;
                payload
            }
            Self::Rename { slot, name } => {
                let mut payload = Vec::with_capacity(1 + MAX_NAME_LEN);
                payload.push(slot.get());
                payload.extend_from_slice(&encode_name(name)?);
                payload
            }
            Self::Copy { source, dest } => vec![source.get(), dest.get()],
        };
        Ok(payload)
    }
}

/// Validate a palette name and zero-pad it to the firmware field width
///
/// # Errors
///
/// Rejects empty names, bytes outside printable ASCII and names longer than
/// [`MAX_NAME_LEN`] bytes.
pub fn encode_name(name: &str) -> Result<[u8; MAX_NAME_LEN]> {
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    if let Some((offset, byte)) = name
        .bytes()
        .enumerate()
        .find(|(_, byte)| !(0x20..0x7F).contains(byte))
    {
        return Err(Error::InvalidNameByte { offset, byte });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }

    let mut field = [0u8; MAX_NAME_LEN];
    field[..name.len()].copy_from_slice(name.as_bytes());
    Ok(field)
}

/// Data produced by a successful operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutput {
    /// Fresh slot info from an info request
    Info(SlotInfo),
    /// Fresh palette from a query
    Palette(Palette),
    /// Command acknowledged, no data
    Done,
}

/// Sends palette operations to the device and keeps the model in sync
///
/// Takes `&mut self` for every exchange, which keeps a single request in
/// flight per connection.
#[derive(Debug)]
pub struct CommandDispatcher<T> {
    transport: T,
    config: TransportConfig,
    model: PaletteModel,
}

impl<T: MidiTransport> CommandDispatcher<T> {
    /// Dispatcher with the default 500 ms response timeout
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, TransportConfig::default())
    }

    /// Dispatcher with explicit transport settings
    pub fn with_config(transport: T, config: TransportConfig) -> Self {
        Self {
            transport,
            config,
            model: PaletteModel::new(),
        }
    }

    /// Run one operation against the device
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] for local validation failures (nothing is
    /// sent), transport failures, malformed responses and firmware errors.
    /// The model is only updated on success, except that a slot-changing
    /// operation whose outcome is unknown (no reply, transport failure or a
    /// malformed reply) still drops that slot's cached palette. A firmware
    /// error confirms nothing changed and leaves the cache alone.
    #[instrument(level = "debug", skip(self), fields(command = %operation.command()))]
    pub fn dispatch(
        &mut self,
        operation: &Operation,
    ) -> std::result::Result<DispatchOutput, AppError> {
        let command = operation.command();

        if let Some(slot) = operation.protected_target() {
            Metrics::record_rejection();
            warn!(%slot, "refusing to write factory slot");
            return Err(AppError::write_protected());
        }

        let frame = operation
            .payload()
            .and_then(|payload| protocol::encode(command, &payload))
            .map_err(|err| {
                Metrics::record_rejection();
                debug!(%err, "request rejected before sending");
                AppError::from(err)
            })?;

        let response = match self.exchange(command, &frame) {
            Ok(response) => response,
            Err(err) => {
                if let Some(slot) = operation.affected_slot() {
                    self.model.invalidate(slot);
                }
                return Err(err);
            }
        };
        let data = response.into_result()?;
        self.apply(operation, &data).map_err(AppError::from)
    }

    fn exchange(
        &mut self,
        command: PaletteCommand,
        frame: &[u8],
    ) -> std::result::Result<SysExResponse, AppError> {
        debug!(frame = ?HexBytes(frame), "sending request");
        self.transport.send(frame)?;
        Metrics::record_request(command);

        let started = Instant::now();
        let bytes = match self.transport.receive(self.config.response_timeout) {
            Ok(bytes) => bytes,
            Err(err) => {
                if err.is_timeout() {
                    Metrics::record_exchange(ExchangeOutcome::TimedOut, started.elapsed());
                }
                warn!(%err, "no usable response");
                return Err(err.into());
            }
        };
        let latency = started.elapsed();
        debug!(frame = ?HexBytes(&bytes), ?latency, "received response");

        match protocol::decode(Bytes::from(bytes), command) {
            Ok(response) => {
                Metrics::record_exchange(
                    ExchangeOutcome::Response {
                        firmware_error: !response.is_success(),
                    },
                    latency,
                );
                Ok(response)
            }
            Err(err) => {
                Metrics::record_exchange(ExchangeOutcome::Malformed, latency);
                Err(err.into())
            }
        }
    }

    fn apply(&mut self, operation: &Operation, data: &[u8]) -> Result<DispatchOutput> {
        match operation {
            Operation::Info => {
                let info = SlotInfo::from_payload(data)?;
                self.model.apply_info(info);
                Ok(DispatchOutput::Info(info))
            }
            Operation::Query { slot } => {
                let palette = Palette::from_payload(data)?;
                self.model.apply_palette(*slot, palette)?;
                Ok(DispatchOutput::Palette(palette))
            }
            _ => {
                if let Some(slot) = operation.affected_slot() {
                    self.model.invalidate(slot);
                }
                Ok(DispatchOutput::Done)
            }
        }
    }

    /// Copy of the last slot info, if any
    #[must_use]
    pub fn slot_info(&self) -> Option<SlotInfo> {
        self.model.slot_info()
    }

    /// Copy of a cached palette, if one is trusted
    #[must_use]
    pub fn palette(&self, slot: SlotIndex) -> Option<Palette> {
        self.model.palette(slot)
    }

    /// Read-only view of the model
    #[must_use]
    pub const fn model(&self) -> &PaletteModel {
        &self.model
    }

    /// Forget all cached state, as after reconnecting
    pub fn reset_model(&mut self) {
        self.model.clear();
    }

    /// Active transport settings
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Mutable access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }
}
