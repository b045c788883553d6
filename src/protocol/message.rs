//! Decoded device responses

use bytes::Bytes;

use super::{AppError, FirmwareError, PaletteCommand};

/// Parsed SysEx response from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysExResponse {
    command: PaletteCommand,
    outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Success(Bytes),
    Failure(u8),
}

impl SysExResponse {
    /// Successful response carrying command-specific data
    #[must_use]
    pub fn success(command: PaletteCommand, data: Bytes) -> Self {
        Self {
            command,
            outcome: Outcome::Success(data),
        }
    }

    /// Failed response carrying a firmware error byte
    #[must_use]
    pub fn failure(command: PaletteCommand, error_code: u8) -> Self {
        Self {
            command,
            outcome: Outcome::Failure(error_code),
        }
    }

    /// Command the response answers
    #[must_use]
    pub const fn command(&self) -> PaletteCommand {
        self.command
    }

    /// Whether the operation succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// Response data, present only on success
    #[must_use]
    pub fn data(&self) -> Option<&Bytes> {
        match &self.outcome {
            Outcome::Success(data) => Some(data),
            Outcome::Failure(_) => None,
        }
    }

    /// Raw firmware error byte, present only on failure
    #[must_use]
    pub const fn error_code(&self) -> Option<u8> {
        match self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(code) => Some(code),
        }
    }

    /// Known firmware error, if the code is in the table
    #[must_use]
    pub fn firmware_error(&self) -> Option<FirmwareError> {
        self.error_code().and_then(FirmwareError::from_code)
    }

    /// Convert into the data payload or a user-facing error
    pub fn into_result(self) -> Result<Bytes, AppError> {
        match self.outcome {
            Outcome::Success(data) => Ok(data),
            Outcome::Failure(code) => Err(AppError::from_firmware(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ErrorCategory;

    #[test]
    fn test_success_accessors() {
        let response = SysExResponse::success(PaletteCommand::Info, Bytes::from_static(&[1, 2]));
        assert!(response.is_success());
        assert_eq!(response.data().map(|d| d.as_ref()), Some(&[1u8, 2][..]));
        assert_eq!(response.error_code(), None);
    }

    #[test]
    fn test_failure_into_result() {
        let response = SysExResponse::failure(PaletteCommand::Save, 0x11);
        assert_eq!(response.firmware_error(), Some(FirmwareError::SdWriteFailed));

        let err = response.into_result().unwrap_err();
        assert_eq!(err.category, ErrorCategory::Sd);
        assert_eq!(err.code, Some(0x11));
    }
}
