//! File system errors

use super::DispenserError;

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> DispenserError {
    DispenserError::IoError {
        message: message.into(),
    }
}
