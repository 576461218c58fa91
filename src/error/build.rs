//! Archive assembly errors

use std::path::Path;

use super::DispenserError;

/// Creates a build failure for the archive at `path`
pub fn failed(path: &Path, reason: impl std::fmt::Display) -> DispenserError {
    DispenserError::BuildFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
