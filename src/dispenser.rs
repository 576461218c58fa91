//! The dispense pipeline
//!
//! validate identifier -> resolve dev kit -> reserve license -> assemble archive
//!
//! The dev kit is resolved before the reservation so that an unknown
//! identifier never consumes a license. A license reserved before a failed
//! build stays in the used bucket; [`LicensePool::release`] is available to
//! callers that decide to return it.

use std::path::Path;

use tracing::{info, warn};

use crate::assembler::{ArchiveAssembler, BuildArchive};
use crate::config::DispenserConfig;
use crate::devkit::{DevKit, DevKitResolver};
use crate::error::Result;
use crate::identifier::Identifier;
use crate::layout::Layout;
use crate::pool::{License, LicensePool, LicenseStore};

/// Outcome of a successful dispense
#[derive(Debug, Clone)]
pub struct Dispensed {
    pub identifier: Identifier,
    pub devkit: DevKit,
    pub license: License,
    pub archive: BuildArchive,
}

impl Dispensed {
    /// File name of the generated archive
    pub fn archive_name(&self) -> &str {
        &self.archive.name
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive.path
    }
}

/// Composes resolver, pool and assembler for one dispenser root
#[derive(Debug, Clone)]
pub struct Dispenser<S = crate::pool::FsLicenseStore> {
    resolver: DevKitResolver,
    pool: LicensePool<S>,
    assembler: ArchiveAssembler,
}

impl Dispenser {
    /// Dispenser over the directories of `layout`
    pub fn open(layout: &Layout, config: &DispenserConfig) -> Self {
        Self::new(
            DevKitResolver::new(&layout.devkit_dir),
            LicensePool::open(
                &layout.available_dir,
                &layout.used_dir,
                config.candidate_order,
            ),
            ArchiveAssembler::new(&layout.builds_dir, config.archive_prefix.as_str()),
        )
    }
}

impl<S: LicenseStore> Dispenser<S> {
    pub fn new(resolver: DevKitResolver, pool: LicensePool<S>, assembler: ArchiveAssembler) -> Self {
        Self {
            resolver,
            pool,
            assembler,
        }
    }

    pub fn pool(&self) -> &LicensePool<S> {
        &self.pool
    }

    /// Dispense a bundle for an untrusted identifier
    ///
    /// `None` and the empty string are both treated as a missing identifier.
    pub fn dispense(&self, raw: Option<&str>) -> Result<Dispensed> {
        let identifier = Identifier::parse_optional(raw)?;
        let platform = identifier.platform();

        let devkit = self.resolver.resolve(&identifier)?;
        let license = self.pool.reserve(&platform)?;

        let archive = match self.assembler.assemble(&identifier, &devkit, &license) {
            Ok(archive) => archive,
            Err(e) => {
                warn!(
                    identifier = %identifier,
                    license = %license.filename,
                    "build failed after license was reserved; license remains used"
                );
                return Err(e);
            }
        };

        info!(
            identifier = %identifier,
            platform = %platform,
            license = %license.filename,
            archive = %archive.name,
            "dispensed dev kit"
        );

        Ok(Dispensed {
            identifier,
            devkit,
            license,
            archive,
        })
    }
}
