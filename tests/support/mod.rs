#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use lxpalette::protocol::{SYSEX_END, SYSEX_START, header};
use lxpalette::{
    FirmwareError, HardwareVersion, MidiTransport, Palette, PaletteCommand, Rgb12, SlotIndex,
    SlotInfo, SlotStatus, TransportError,
};

/// What the simulated device does with the next reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Swallow the reply so the host times out.
    Drop,
    /// Cut the trailing end byte.
    Truncate,
    /// Answer with another command's header.
    WrongCommand,
}

/// In-memory LX Palette that answers SysEx requests like the firmware does.
pub struct SimDevice {
    pub active: u8,
    pub hw_version: HardwareVersion,
    pub palettes: [Option<Palette>; 8],
    pub names: [String; 8],
    pub sd_ready: bool,
    pub received: Vec<Vec<u8>>,
    faults: VecDeque<Fault>,
    outbox: VecDeque<Vec<u8>>,
}

impl SimDevice {
    pub fn new() -> Self {
        let mut palettes: [Option<Palette>; 8] = Default::default();
        for n in 0..2u8 {
            let mut palette = Palette::new(slot(n), SlotStatus::Factory);
            palette.track_smd = [Rgb12::new(4095, 0, 0); 4];
            palettes[usize::from(n)] = Some(palette);
        }
        Self {
            active: 0,
            hw_version: HardwareVersion::V1,
            palettes,
            names: Default::default(),
            sd_ready: true,
            received: Vec::new(),
            faults: VecDeque::new(),
            outbox: VecDeque::new(),
        }
    }

    /// Store a user palette in a slot.
    pub fn with_user_palette(mut self, n: u8, color: Rgb12) -> Self {
        let mut palette = Palette::new(slot(n), SlotStatus::UserLoaded);
        palette.track_btn = [[color; 3]; 4];
        self.palettes[usize::from(n)] = Some(palette);
        self
    }

    pub fn inject(&mut self, fault: Fault) {
        self.faults.push_back(fault);
    }

    fn status(&self, n: usize) -> SlotStatus {
        self.palettes[n].map_or(SlotStatus::Empty, |p| p.status)
    }

    fn handle(&mut self, frame: &[u8]) -> Vec<u8> {
        let command = PaletteCommand::from_u8(frame[4]).expect("known command");
        let payload = &frame[5..frame.len() - 1];
        match self.execute(command, payload) {
            Ok(data) => reply(command, 0x01, &data),
            Err(err) => reply(command, 0x00, &[err.code()]),
        }
    }

    fn execute(
        &mut self,
        command: PaletteCommand,
        payload: &[u8],
    ) -> Result<Vec<u8>, FirmwareError> {
        let target = payload
            .first()
            .map(|b| usize::from(*b))
            .unwrap_or_default();
        if command != PaletteCommand::Info && target >= 8 {
            return Err(FirmwareError::InvalidSlot);
        }

        match command {
            PaletteCommand::Info => {
                let info = SlotInfo {
                    active_slot: slot(self.active),
                    hw_version: self.hw_version,
                    slot_status: std::array::from_fn(|n| self.status(n)),
                };
                Ok(info.to_payload())
            }
            PaletteCommand::Query => {
                let palette = self.palettes[target].ok_or(FirmwareError::SlotEmpty)?;
                Ok(palette.to_payload().expect("valid colours"))
            }
            PaletteCommand::SetRgb => {
                let palette = self.palettes[target]
                    .as_mut()
                    .ok_or(FirmwareError::SlotEmpty)?;
                let [field, track, level] = [payload[1], payload[2], payload[3]];
                let field = match field {
                    0 => lxpalette::LedField::TrackSmd,
                    1 => lxpalette::LedField::TrackSmdDim,
                    2 => lxpalette::LedField::TrackSmdMedium,
                    3 => lxpalette::LedField::TrackButton,
                    _ => return Err(FirmwareError::InvalidField),
                };
                let address = lxpalette::LedAddress::new(field, track, level)
                    .map_err(|_| FirmwareError::InvalidTrack)?;
                let color = Rgb12::decode(&payload[4..]).map_err(|_| FirmwareError::ValueOutOfRange)?;
                palette.set_color(address, color);
                if palette.status != SlotStatus::Factory {
                    palette.status = SlotStatus::UserModified;
                }
                Ok(Vec::new())
            }
            PaletteCommand::Save
            | PaletteCommand::Delete
            | PaletteCommand::Rename
            | PaletteCommand::Reset
                if target < 2 =>
            {
                Err(FirmwareError::FactoryProtected)
            }
            PaletteCommand::Save => {
                self.require_sd()?;
                let palette = self.palettes[target]
                    .as_mut()
                    .ok_or(FirmwareError::SlotEmpty)?;
                palette.status = SlotStatus::UserLoaded;
                Ok(Vec::new())
            }
            PaletteCommand::Load => {
                self.require_sd()?;
                let palette = self.palettes[target]
                    .as_mut()
                    .ok_or(FirmwareError::FileNotFound)?;
                if palette.status == SlotStatus::UserModified {
                    palette.status = SlotStatus::UserLoaded;
                }
                self.active = target as u8;
                Ok(Vec::new())
            }
            PaletteCommand::Delete => {
                self.require_sd()?;
                self.palettes[target]
                    .take()
                    .ok_or(FirmwareError::FileNotFound)?;
                Ok(Vec::new())
            }
            PaletteCommand::Rename => {
                self.require_sd()?;
                let name = &payload[1..];
                if name.len() != 32 {
                    return Err(FirmwareError::NameTooLong);
                }
                let end = name.iter().position(|b| *b == 0).unwrap_or(name.len());
                self.names[target] = String::from_utf8(name[..end].to_vec())
                    .map_err(|_| FirmwareError::InvalidNameCharacters)?;
                Ok(Vec::new())
            }
            PaletteCommand::Copy => {
                let dest = usize::from(payload[1]);
                if dest < 2 {
                    return Err(FirmwareError::FactoryProtected);
                }
                let source = self.palettes[target].ok_or(FirmwareError::SlotEmpty)?;
                let mut copy = Palette::new(slot(dest as u8), SlotStatus::UserModified);
                copy.track_smd = source.track_smd;
                copy.track_smd_dim = source.track_smd_dim;
                copy.track_smd_medium = source.track_smd_medium;
                copy.track_btn = source.track_btn;
                self.palettes[dest] = Some(copy);
                Ok(Vec::new())
            }
            PaletteCommand::Reset => {
                self.palettes[target] = None;
                Ok(Vec::new())
            }
        }
    }

    fn require_sd(&self) -> Result<(), FirmwareError> {
        if self.sd_ready {
            Ok(())
        } else {
            Err(FirmwareError::SdNotReady)
        }
    }
}

impl MidiTransport for SimDevice {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        assert_eq!(frame.first(), Some(&SYSEX_START));
        assert_eq!(frame.last(), Some(&SYSEX_END));
        assert!(
            frame[1..frame.len() - 1].iter().all(|b| *b <= 0x7F),
            "host sent a non 7-bit byte"
        );
        self.received.push(frame.to_vec());

        let mut response = self.handle(frame);
        match self.faults.pop_front() {
            None => self.outbox.push_back(response),
            Some(Fault::Drop) => {}
            Some(Fault::Truncate) => {
                response.pop();
                self.outbox.push_back(response);
            }
            Some(Fault::WrongCommand) => {
                response[4] = if response[4] == 0x01 { 0x02 } else { 0x01 };
                self.outbox.push_back(response);
            }
        }
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        self.outbox
            .pop_front()
            .ok_or_else(|| TransportError::timeout(timeout))
    }
}

pub fn slot(n: u8) -> SlotIndex {
    SlotIndex::new(n).expect("slot in range")
}

pub fn reply(command: PaletteCommand, status: u8, data: &[u8]) -> Vec<u8> {
    let mut frame = vec![SYSEX_START];
    frame.extend_from_slice(&header(command));
    frame.push(status);
    frame.extend_from_slice(data);
    frame.push(SYSEX_END);
    frame
}
