//! Filesystem-backed license store

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::rename::rename_noreplace;
use super::{ClaimOutcome, Inventory, LicenseStore, is_plain_filename};
use crate::identifier::Platform;

/// License store over an available directory and a used directory
#[derive(Debug, Clone)]
pub struct FsLicenseStore {
    available_dir: PathBuf,
    used_dir: PathBuf,
}

impl FsLicenseStore {
    pub fn new(available_dir: impl Into<PathBuf>, used_dir: impl Into<PathBuf>) -> Self {
        Self {
            available_dir: available_dir.into(),
            used_dir: used_dir.into(),
        }
    }

    /// Bucket directory of a platform
    ///
    /// The empty platform maps to the loose files directly under the
    /// available directory.
    pub fn bucket(&self, platform: &Platform) -> PathBuf {
        if platform.is_empty() {
            self.available_dir.clone()
        } else {
            self.available_dir.join(platform.as_str())
        }
    }

    pub fn available_dir(&self) -> &Path {
        &self.available_dir
    }

    pub fn used_dir(&self) -> &Path {
        &self.used_dir
    }
}

/// Names of the license files directly inside `dir`
///
/// Hidden files, directories and names that are not valid UTF-8 are skipped.
/// A missing directory has no licenses.
fn license_files(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = %entry.path().display(), "skipping license with non UTF-8 name");
            continue;
        };
        if !is_plain_filename(&name) || !entry.path().is_file() {
            continue;
        }
        names.push(name);
    }

    Ok(names)
}

fn source_vanished(source: &Path) -> bool {
    matches!(fs::symlink_metadata(source), Err(e) if e.kind() == io::ErrorKind::NotFound)
}

impl LicenseStore for FsLicenseStore {
    fn list_available(&self, platform: &Platform) -> io::Result<Vec<String>> {
        license_files(&self.bucket(platform))
    }

    fn available_path(&self, platform: &Platform, filename: &str) -> PathBuf {
        self.bucket(platform).join(filename)
    }

    fn used_path(&self, filename: &str) -> PathBuf {
        self.used_dir.join(filename)
    }

    fn claim(&self, platform: &Platform, filename: &str) -> ClaimOutcome {
        let source = self.available_path(platform, filename);
        let target = self.used_path(filename);

        match rename_noreplace(&source, &target) {
            Ok(()) => ClaimOutcome::Claimed,
            // Only a vanished source means another reserver got there first.
            // ENOENT with the source present is a missing used directory, and
            // an existing target with the source present is a name collision.
            Err(_) if source_vanished(&source) => ClaimOutcome::LostRace,
            Err(e) if e.kind() == io::ErrorKind::NotFound => ClaimOutcome::Fault(io::Error::new(
                io::ErrorKind::NotFound,
                format!("used directory {} is missing", self.used_dir.display()),
            )),
            Err(e) => ClaimOutcome::Fault(e),
        }
    }

    fn read_claimed(&self, filename: &str) -> io::Result<Vec<u8>> {
        fs::read(self.used_path(filename))
    }

    fn release(&self, platform: &Platform, filename: &str) -> io::Result<()> {
        let bucket = self.bucket(platform);
        fs::create_dir_all(&bucket)?;
        rename_noreplace(&self.used_path(filename), &bucket.join(filename))
    }

    fn inventory(&self) -> io::Result<Inventory> {
        let mut inventory = Inventory {
            used: license_files(&self.used_dir)?.len(),
            ..Inventory::default()
        };

        let loose = license_files(&self.available_dir)?.len();
        if loose > 0 {
            inventory.available.insert(String::new(), loose);
        }

        let entries = match fs::read_dir(&self.available_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(inventory),
            Err(e) => return Err(e),
        };

        for entry in entries {
            let entry = entry?;
            let Some(platform) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_plain_filename(&platform) || !entry.path().is_dir() {
                continue;
            }
            let count = license_files(&entry.path())?.len();
            inventory.available.insert(platform, count);
        }

        Ok(inventory)
    }
}
