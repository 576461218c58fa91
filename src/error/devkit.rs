//! Payload resolution errors

use std::path::Path;

use super::DispenserError;

/// Creates a not found error carrying both attempted locations
pub fn not_found(directory: &Path, archive: &Path) -> DispenserError {
    DispenserError::DevKitNotFound {
        directory: directory.display().to_string(),
        archive: archive.display().to_string(),
    }
}
