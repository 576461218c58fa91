//! Dev kit payload resolution
//!
//! A dev kit is stored either as a directory `<devkit_dir>/<identifier>/` or as
//! a prebuilt archive `<devkit_dir>/<identifier>.zip`. The directory wins when
//! both exist.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, devkit};
use crate::identifier::Identifier;

/// Extension of prebuilt dev kit archives
pub const ARCHIVE_EXTENSION: &str = "zip";

/// A resolved dev kit payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevKit {
    /// A directory tree whose files are added individually
    Directory { root: PathBuf },

    /// A prebuilt archive embedded as a single opaque entry
    PrebuiltArchive { path: PathBuf },
}

impl DevKit {
    /// Path of the payload on disk
    pub fn path(&self) -> &Path {
        match self {
            DevKit::Directory { root } => root,
            DevKit::PrebuiltArchive { path } => path,
        }
    }
}

/// Locates dev kits under a base directory
#[derive(Debug, Clone)]
pub struct DevKitResolver {
    base: PathBuf,
}

impl DevKitResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Candidate locations for an identifier: (directory, archive)
    pub fn candidates(&self, id: &Identifier) -> (PathBuf, PathBuf) {
        let directory = self.base.join(id.as_str());
        let archive = self
            .base
            .join(format!("{}.{}", id.as_str(), ARCHIVE_EXTENSION));
        (directory, archive)
    }

    /// Resolve the dev kit for a validated identifier
    ///
    /// # Errors
    ///
    /// Returns `DevKitNotFound` carrying both attempted paths when neither the
    /// directory nor the archive exists.
    pub fn resolve(&self, id: &Identifier) -> Result<DevKit> {
        let (directory, archive) = self.candidates(id);

        if directory.is_dir() {
            debug!(identifier = %id, path = %directory.display(), "resolved dev kit directory");
            return Ok(DevKit::Directory { root: directory });
        }

        if archive.is_file() {
            debug!(identifier = %id, path = %archive.display(), "resolved prebuilt dev kit");
            return Ok(DevKit::PrebuiltArchive { path: archive });
        }

        Err(devkit::not_found(&directory, &archive))
    }
}
