//! License pool errors

use std::path::Path;

use super::DispenserError;

pub fn exhausted(platform: impl Into<String>) -> DispenserError {
    DispenserError::PoolExhausted {
        platform: platform.into(),
    }
}

pub fn reservation_failed(path: &Path, reason: impl std::fmt::Display) -> DispenserError {
    DispenserError::ReservationFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

pub fn release_failed(path: &Path, reason: impl std::fmt::Display) -> DispenserError {
    DispenserError::ReleaseFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
