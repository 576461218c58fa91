//! Configuration errors

use std::path::Path;

use super::DispenserError;

pub fn read_failed(path: &Path, reason: impl std::fmt::Display) -> DispenserError {
    DispenserError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

pub fn parse_failed(path: &Path, reason: impl std::fmt::Display) -> DispenserError {
    DispenserError::ConfigParseFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

pub fn invalid(message: impl Into<String>) -> DispenserError {
    DispenserError::ConfigInvalid {
        message: message.into(),
    }
}
