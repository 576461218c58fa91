//! License pool with race-safe reservation
//!
//! Licenses live in one of two states:
//! - available: `<available_dir>/<platform>/<filename>`
//! - used: `<used_dir>/<filename>` (flat, platform is not retained)
//!
//! A reservation claims a license by moving it from available to used with a
//! single rename. The rename is the only coordination point between
//! concurrent reservers, which may be separate threads, processes or hosts
//! sharing the filesystem: if two reservers race for the same candidate, only
//! one rename succeeds and the loser moves on to the next candidate.
//!
//! Licenses are never deleted, only moved between the two states.

mod rename;
mod store;


use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, pool};
use crate::identifier::Platform;

pub use rename::rename_noreplace;
pub use store::FsLicenseStore;

/// Order in which available licenses are tried during a reservation
///
/// The directory listing order carries no meaning, so the order is always
/// imposed explicitly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CandidateOrder {
    /// Random order per reservation, spreading concurrent reservers out
    #[default]
    Shuffled,

    /// Ascending filename order
    Lexical,
}

impl CandidateOrder {
    /// Arrange candidate filenames according to this policy
    pub fn arrange(self, candidates: &mut [String]) {
        match self {
            CandidateOrder::Shuffled => candidates.shuffle(&mut rand::thread_rng()),
            CandidateOrder::Lexical => candidates.sort(),
        }
    }
}

/// Result of a single atomic claim attempt
#[derive(Debug)]
pub enum ClaimOutcome {
    /// The license was moved into the used bucket by this caller
    Claimed,

    /// The license disappeared before it could be moved (another reserver won)
    LostRace,

    /// The move failed for a reason other than contention
    Fault(io::Error),
}

/// Storage backing a [`LicensePool`]
///
/// `claim` must be all-or-nothing: of several concurrent claims on the same
/// candidate, at most one may return [`ClaimOutcome::Claimed`].
pub trait LicenseStore {
    /// Filenames currently available for `platform`, in no particular order
    fn list_available(&self, platform: &Platform) -> io::Result<Vec<String>>;

    /// Location of an available license
    fn available_path(&self, platform: &Platform, filename: &str) -> PathBuf;

    /// Location of a used license
    fn used_path(&self, filename: &str) -> PathBuf;

    /// Atomically move an available license into the used bucket
    fn claim(&self, platform: &Platform, filename: &str) -> ClaimOutcome;

    /// Read the content of a claimed license
    fn read_claimed(&self, filename: &str) -> io::Result<Vec<u8>>;

    /// Move a used license back into the available bucket of `platform`
    fn release(&self, platform: &Platform, filename: &str) -> io::Result<()>;

    /// Count available licenses per platform and used licenses
    fn inventory(&self) -> io::Result<Inventory>;
}

/// A license reserved for exclusive use by one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    /// Filename, unchanged by the move
    pub filename: String,

    /// Platform bucket the license was drawn from
    pub platform: Platform,

    /// Post-move location in the used bucket
    pub path: PathBuf,

    /// Content captured after the move
    pub contents: Vec<u8>,
}

/// Snapshot of the pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Available license count per platform (the empty platform is `""`)
    pub available: BTreeMap<String, usize>,

    /// Number of used licenses
    pub used: usize,
}

impl Inventory {
    pub fn total_available(&self) -> usize {
        self.available.values().sum()
    }
}

/// The license pool
#[derive(Debug, Clone)]
pub struct LicensePool<S = FsLicenseStore> {
    store: S,
    order: CandidateOrder,
}

impl LicensePool<FsLicenseStore> {
    /// Pool over the filesystem buckets `available_dir` and `used_dir`
    pub fn open(
        available_dir: impl Into<PathBuf>,
        used_dir: impl Into<PathBuf>,
        order: CandidateOrder,
    ) -> Self {
        Self::with_store(FsLicenseStore::new(available_dir, used_dir), order)
    }
}

impl<S: LicenseStore> LicensePool<S> {
    pub fn with_store(store: S, order: CandidateOrder) -> Self {
        Self { store, order }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn order(&self) -> CandidateOrder {
        self.order
    }

    /// Reserve one available license for `platform`
    ///
    /// Candidates are tried in [`CandidateOrder`]. A candidate lost to a
    /// concurrent reserver is skipped; any other claim failure ends the
    /// reservation immediately.
    ///
    /// # Errors
    ///
    /// - `PoolExhausted` when no candidate could be claimed
    /// - `ReservationFailed` on listing faults, non-race claim faults, or a
    ///   failure to read the license after it was moved
    pub fn reserve(&self, platform: &Platform) -> Result<License> {
        let mut candidates = self
            .store
            .list_available(platform)
            .map_err(|e| pool::reservation_failed(&self.store.available_path(platform, ""), e))?;

        self.order.arrange(&mut candidates);
        debug!(platform = %platform, candidates = candidates.len(), "reserving license");

        for filename in candidates {
            match self.store.claim(platform, &filename) {
                ClaimOutcome::Claimed => {
                    let path = self.store.used_path(&filename);
                    let contents = self
                        .store
                        .read_claimed(&filename)
                        .map_err(|e| pool::reservation_failed(&path, e))?;

                    info!(platform = %platform, license = %filename, "reserved license");
                    return Ok(License {
                        filename,
                        platform: platform.clone(),
                        path,
                        contents,
                    });
                }
                ClaimOutcome::LostRace => {
                    debug!(platform = %platform, license = %filename, "lost race, trying next license");
                }
                ClaimOutcome::Fault(e) => {
                    let path = self.store.available_path(platform, &filename);
                    warn!(path = %path.display(), error = %e, "license claim failed");
                    return Err(pool::reservation_failed(&path, e));
                }
            }
        }

        Err(pool::exhausted(platform.as_str()))
    }

    /// Return a reserved license to the available bucket it came from
    ///
    /// Not used by the dispense pipeline itself.
    pub fn release(&self, license: &License) -> Result<()> {
        self.release_named(&license.platform, &license.filename)
    }

    /// Return the used license `filename` to the available bucket of `platform`
    pub fn release_named(&self, platform: &Platform, filename: &str) -> Result<()> {
        let used = self.store.used_path(filename);
        if !is_plain_filename(filename) {
            return Err(pool::release_failed(&used, "not a plain license filename"));
        }

        self.store
            .release(platform, filename)
            .map_err(|e| pool::release_failed(&used, e))?;

        info!(platform = %platform, license = %filename, "released license");
        Ok(())
    }

    /// Snapshot of available and used counts
    pub fn inventory(&self) -> Result<Inventory> {
        self.store.inventory().map_err(|e| {
            crate::error::fs::io_error(format!("Failed to read license pool: {e}"))
        })
    }
}

/// A single, non-hidden path component
pub(crate) fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}
