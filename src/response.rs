//! Structured dispense responses
//!
//! Success: `{"success": true, "zip_name": "...", "license": "..."}`
//!
//! Failure: `{"success": false, "error": "...", "code": "...", "status": 404}`

use serde::Serialize;

use crate::dispenser::Dispensed;
use crate::error::{DispenserError, ErrorCategory, Result};

/// Response handed back to the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DispenseResponse {
    Success {
        success: bool,
        zip_name: String,
        license: String,
    },
    Failure {
        success: bool,
        error: String,
        code: ErrorCategory,
        status: u16,
    },
}

impl DispenseResponse {
    pub fn success(dispensed: &Dispensed) -> Self {
        DispenseResponse::Success {
            success: true,
            zip_name: dispensed.archive.name.clone(),
            license: dispensed.license.filename.clone(),
        }
    }

    pub fn failure(err: &DispenserError) -> Self {
        let category = err.category();
        DispenseResponse::Failure {
            success: false,
            error: err.to_string(),
            code: category,
            status: category.status(),
        }
    }

    pub fn from_result(result: &Result<Dispensed>) -> Self {
        match result {
            Ok(dispensed) => Self::success(dispensed),
            Err(err) => Self::failure(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispenseResponse::Success { .. })
    }

    /// HTTP-style status of the response
    pub fn status(&self) -> u16 {
        match self {
            DispenseResponse::Success { .. } => 200,
            DispenseResponse::Failure { status, .. } => *status,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
