//! Build archive assembly
//!
//! Every dispense produces a fresh zip archive in the builds directory with
//! two top-level groups:
//!
//! - `dev-kit/...`: the files of a directory dev kit (relative paths kept),
//!   or the prebuilt dev kit archive as one opaque entry
//! - `license/<filename>`: the reserved license
//!
//! Archives are created with create-new semantics and written once. A build
//! that fails part way leaves its partial file in place.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::devkit::DevKit;
use crate::error::{Result, build};
use crate::identifier::Identifier;
use crate::pool::License;

/// Top-level group holding the dev kit payload
pub const DEVKIT_PREFIX: &str = "dev-kit";

/// Top-level group holding the license
pub const LICENSE_PREFIX: &str = "license";

/// A finalized build archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArchive {
    /// Generated file name, e.g. `devkit_kitA-NVIDIA_<token>.zip`
    pub name: String,

    /// Location of the archive
    pub path: PathBuf,

    /// Entry names in the order they were written
    pub entries: Vec<String>,
}

/// Writes build archives into an output directory
#[derive(Debug, Clone)]
pub struct ArchiveAssembler {
    output_dir: PathBuf,
    prefix: String,
}

impl ArchiveAssembler {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Unique archive name for an identifier
    ///
    /// The random v4 UUID keeps names distinct across concurrent requests for
    /// the same identifier, including requests from other processes.
    pub fn archive_name(&self, id: &Identifier) -> String {
        format!("{}_{}_{}.zip", self.prefix, id, Uuid::new_v4().simple())
    }

    /// Build an archive holding `devkit` and `license`
    ///
    /// # Errors
    ///
    /// Returns `BuildFailed` if the archive cannot be created, populated or
    /// finalized.
    pub fn assemble(
        &self,
        id: &Identifier,
        devkit: &DevKit,
        license: &License,
    ) -> Result<BuildArchive> {
        let name = self.archive_name(id);
        let path = self.output_dir.join(&name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| build::failed(&path, format!("Could not create ZIP file: {e}")))?;

        let mut writer = ArchiveWriter::new(file);

        match devkit {
            DevKit::Directory { root } => writer.add_directory(root)?,
            DevKit::PrebuiltArchive { path: archive } => writer.add_prebuilt(archive)?,
        }
        writer.add_license(license)?;

        let entries = writer.finish().map_err(|e| build::failed(&path, e))?;

        info!(
            archive = %name,
            entries = entries.len(),
            license = %license.filename,
            "built archive"
        );

        Ok(BuildArchive {
            name,
            path,
            entries,
        })
    }
}

/// Zip writer that records the entries it adds
struct ArchiveWriter {
    zip: ZipWriter<BufWriter<File>>,
    entries: Vec<String>,
}

impl ArchiveWriter {
    fn new(file: File) -> Self {
        Self {
            zip: ZipWriter::new(BufWriter::new(file)),
            entries: Vec::new(),
        }
    }

    /// Add every non-directory entry under `root` as `dev-kit/<relative path>`
    fn add_directory(&mut self, root: &Path) -> Result<()> {
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| build::failed(root, e))?;
            if entry.file_type().is_dir() || entry.path().is_dir() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| build::failed(entry.path(), e))?;
            let name = format!("{DEVKIT_PREFIX}/{}", entry_name(relative));

            self.add_file(entry.path(), name, CompressionMethod::Deflated)?;
        }
        Ok(())
    }

    /// Embed a prebuilt archive unexpanded as `dev-kit/<filename>`
    fn add_prebuilt(&mut self, archive: &Path) -> Result<()> {
        let file_name = archive
            .file_name()
            .ok_or_else(|| build::failed(archive, "dev kit archive has no file name"))?;
        let name = format!("{DEVKIT_PREFIX}/{}", file_name.to_string_lossy());

        // Already compressed; stored as-is
        self.add_file(archive, name, CompressionMethod::Stored)
    }

    /// Add the license from its post-move location as `license/<filename>`
    fn add_license(&mut self, license: &License) -> Result<()> {
        let name = format!("{LICENSE_PREFIX}/{}", license.filename);
        self.add_file(&license.path, name, CompressionMethod::Deflated)
    }

    fn add_file(&mut self, source: &Path, name: String, method: CompressionMethod) -> Result<()> {
        let mut input = File::open(source).map_err(|e| build::failed(source, e))?;
        let len = input
            .metadata()
            .map_err(|e| build::failed(source, e))?
            .len();

        let options = SimpleFileOptions::default()
            .compression_method(method)
            .large_file(len >= u64::from(u32::MAX));

        self.zip
            .start_file(name.as_str(), options)
            .map_err(|e| build::failed(source, e))?;
        io::copy(&mut input, &mut self.zip).map_err(|e| build::failed(source, e))?;

        debug!(entry = %name, bytes = len, "added archive entry");
        self.entries.push(name);
        Ok(())
    }

    /// Write the central directory and flush the file to disk
    fn finish(self) -> io::Result<Vec<String>> {
        let mut out = self.zip.finish().map_err(io::Error::other)?;
        out.flush()?;
        out.get_ref().sync_all()?;
        Ok(self.entries)
    }
}

/// Archive entry name for a relative path, always `/`-separated
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
