//! Common test utilities for dispenser integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use zip::ZipArchive;

/// A dispenser root in a temporary directory
pub struct TestRoot {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to dispenser root
    pub path: PathBuf,
}

impl TestRoot {
    /// Create a new root with empty `available/`, `used/` and `builds/`
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        for dir in ["available", "used", "builds", "dev-kit"] {
            std::fs::create_dir_all(path.join(dir)).expect("Failed to create directory");
        }
        Self { temp, path }
    }

    /// Write a file under the root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Add a license to a platform bucket
    pub fn add_license(&self, platform: &str, filename: &str, content: &str) {
        self.write_file(&format!("available/{platform}/{filename}"), content);
    }

    /// Add `count` licenses named `lic<N>.txt` to a platform bucket
    pub fn add_licenses(&self, platform: &str, count: usize) {
        for i in 0..count {
            let name = format!("lic{i:03}.txt");
            self.add_license(platform, &name, &format!("{platform}:{name}"));
        }
    }

    /// Create a directory dev kit with `files` (relative path, content)
    pub fn add_devkit_dir(&self, identifier: &str, files: &[(&str, &str)]) {
        std::fs::create_dir_all(self.path.join("dev-kit").join(identifier))
            .expect("Failed to create dev kit directory");
        for (path, content) in files {
            self.write_file(&format!("dev-kit/{identifier}/{path}"), content);
        }
    }

    /// Create a prebuilt dev kit archive with raw bytes
    pub fn add_devkit_zip(&self, identifier: &str, bytes: &[u8]) {
        std::fs::write(
            self.path.join("dev-kit").join(format!("{identifier}.zip")),
            bytes,
        )
        .expect("Failed to write dev kit archive");
    }

    /// Filenames directly inside a directory under the root
    pub fn names_in(&self, dir: &str) -> BTreeSet<String> {
        std::fs::read_dir(self.path.join(dir))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().is_file())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Path of a build archive
    pub fn build_path(&self, name: &str) -> PathBuf {
        self.path.join("builds").join(name)
    }

    /// Command for the dispenser binary rooted here
    pub fn cmd(&self) -> Command {
        let mut cmd = dispenser_cmd();
        cmd.arg("--root").arg(&self.path);
        cmd
    }
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispenser binary with developer overrides removed
#[allow(deprecated)]
pub fn dispenser_cmd() -> Command {
    let mut cmd = Command::cargo_bin("dispenser").expect("dispenser binary");
    cmd.env_remove("DISPENSER_ROOT");
    cmd.env_remove("DISPENSER_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Entry names of a zip archive
pub fn zip_entries(path: &Path) -> BTreeSet<String> {
    let archive = ZipArchive::new(File::open(path).expect("open archive")).expect("read archive");
    archive.file_names().map(str::to_string).collect()
}

/// Bytes of one zip entry
pub fn zip_entry(path: &Path, name: &str) -> Vec<u8> {
    let mut archive =
        ZipArchive::new(File::open(path).expect("open archive")).expect("read archive");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).expect("read entry");
    buf
}

/// Build a set of owned strings
pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
