//! Identifier validation errors

use super::DispenserError;

/// Creates a missing identifier error
pub fn missing() -> DispenserError {
    DispenserError::MissingIdentifier
}

/// Creates a malformed identifier error
pub fn malformed(identifier: impl Into<String>) -> DispenserError {
    DispenserError::MalformedIdentifier {
        identifier: identifier.into(),
    }
}
