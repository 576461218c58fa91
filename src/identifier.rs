//! Identifier validation and platform derivation
//!
//! The identifier is the only untrusted input that reaches path construction,
//! so every path the dispenser builds goes through a validated [`Identifier`].

use std::fmt;

use crate::error::{Result, identifier};

/// A validated dev kit identifier
///
/// Only characters from `[A-Za-z0-9._-]` are accepted. The identifier and
/// its platform segment are both joined onto paths, so neither may be `.`
/// or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

/// Platform tag scoping the license bucket a request draws from
///
/// May be empty when the identifier has no second segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Platform(String);

/// Returns true for characters allowed in an identifier
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Returns true for the relative directory names `.` and `..`
fn is_dot_dir(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Second `-`-delimited segment of a raw identifier, or empty
fn platform_segment(raw: &str) -> &str {
    raw.split('-').nth(1).unwrap_or_default()
}

impl Identifier {
    /// Validate a raw identifier
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` for empty input and `MalformedIdentifier`
    /// when any character falls outside the allowed class or when the
    /// identifier or its platform segment is `.` or `..`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(identifier::missing());
        }

        if !raw.chars().all(is_identifier_char)
            || is_dot_dir(raw)
            || is_dot_dir(platform_segment(raw))
        {
            return Err(identifier::malformed(raw));
        }

        Ok(Self(raw.to_string()))
    }

    /// Validate an optional raw identifier, treating `None` as missing
    pub fn parse_optional(raw: Option<&str>) -> Result<Self> {
        Self::parse(raw.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the platform tag: the second `-`-delimited segment, or empty.
    ///
    /// `kitA-NVIDIA-v2` yields `NVIDIA`; `kitA` yields the empty platform.
    pub fn platform(&self) -> Platform {
        Platform(platform_segment(&self.0).to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Platform {
    /// Build a platform tag from an operator-supplied name
    ///
    /// Platform names come from the same character class as identifiers, so
    /// anything else is rejected before it can be joined onto a path.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }
        if raw.contains('-') || is_dot_dir(raw) || !raw.chars().all(is_identifier_char) {
            return Err(identifier::malformed(raw));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the platform for an identifier
pub fn derive_platform(id: &Identifier) -> Platform {
    id.platform()
}
