//! Error types and handling for the dispenser
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`identifier`]: Identifier validation errors
//! - [`devkit`]: Payload resolution errors
//! - [`pool`]: License reservation and release errors
//! - [`build`]: Archive assembly errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

pub mod build;
pub mod config;
pub mod devkit;
pub mod fs;
pub mod identifier;
pub mod pool;


use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Main error type for dispenser operations
#[derive(Error, Diagnostic, Debug)]
pub enum DispenserError {
    // Identifier errors
    #[error("Missing identifier.")]
    #[diagnostic(
        code(dispenser::identifier::missing),
        help("Pass the dev kit identifier, e.g. 'dispenser dispense kitA-NVIDIA-v2'")
    )]
    MissingIdentifier,

    #[error("Invalid identifier format: '{identifier}'")]
    #[diagnostic(
        code(dispenser::identifier::malformed),
        help("Identifiers may only contain A-Z, a-z, 0-9, '.', '_' and '-'")
    )]
    MalformedIdentifier { identifier: String },

    // Payload errors
    #[error("Dev kit not found as folder ({directory}) or zip ({archive})")]
    #[diagnostic(
        code(dispenser::devkit::not_found),
        help("Place the dev kit under the dev-kit directory as a folder or a .zip named after the identifier")
    )]
    DevKitNotFound { directory: String, archive: String },

    // Pool errors
    #[error("No available license files for platform '{platform}'.")]
    #[diagnostic(
        code(dispenser::pool::exhausted),
        help("Add license files to the platform's available directory")
    )]
    PoolExhausted { platform: String },

    #[error("Could not reserve license {path}: {reason}")]
    #[diagnostic(code(dispenser::pool::reservation_failed))]
    ReservationFailed { path: String, reason: String },

    #[error("Could not release license {path}: {reason}")]
    #[diagnostic(code(dispenser::pool::release_failed))]
    ReleaseFailed { path: String, reason: String },

    // Build errors
    #[error("Could not build archive {path}: {reason}")]
    #[diagnostic(code(dispenser::build::failed))]
    BuildFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(dispenser::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(dispenser::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(dispenser::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(dispenser::fs::io_error))]
    IoError { message: String },
}

/// Coarse error category exposed in responses
///
/// Callers map these onto their own status codes; [`ErrorCategory::status`]
/// gives the HTTP-style mapping used by the JSON response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    PoolExhausted,
    ReservationFailed,
    BuildFailed,
    Internal,
}

impl ErrorCategory {
    /// HTTP-style status for this category
    pub fn status(self) -> u16 {
        match self {
            ErrorCategory::InvalidInput => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::PoolExhausted
            | ErrorCategory::ReservationFailed
            | ErrorCategory::BuildFailed
            | ErrorCategory::Internal => 500,
        }
    }

    /// Whether the requester (rather than the service) is at fault
    pub fn is_client_error(self) -> bool {
        self.status() < 500
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::PoolExhausted => "pool_exhausted",
            ErrorCategory::ReservationFailed => "reservation_failed",
            ErrorCategory::BuildFailed => "build_failed",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispenserError {
    /// Category used for the structured response
    pub fn category(&self) -> ErrorCategory {
        match self {
            DispenserError::MissingIdentifier | DispenserError::MalformedIdentifier { .. } => {
                ErrorCategory::InvalidInput
            }
            DispenserError::DevKitNotFound { .. } => ErrorCategory::NotFound,
            DispenserError::PoolExhausted { .. } => ErrorCategory::PoolExhausted,
            DispenserError::ReservationFailed { .. } => ErrorCategory::ReservationFailed,
            DispenserError::BuildFailed { .. } => ErrorCategory::BuildFailed,
            DispenserError::ReleaseFailed { .. }
            | DispenserError::ConfigReadFailed { .. }
            | DispenserError::ConfigParseFailed { .. }
            | DispenserError::ConfigInvalid { .. }
            | DispenserError::IoError { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<std::io::Error> for DispenserError {
    fn from(err: std::io::Error) -> Self {
        DispenserError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DispenserError {
    fn from(err: serde_json::Error) -> Self {
        DispenserError::IoError {
            message: format!("Failed to serialize response: {err}"),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DispenserError>;
