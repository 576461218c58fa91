//! Directory layout of a dispenser root

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DispenserConfig;
use crate::error::{Result, fs as fs_error};

/// Resolved directories of a dispenser root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub available_dir: PathBuf,
    pub used_dir: PathBuf,
    pub builds_dir: PathBuf,
    pub devkit_dir: PathBuf,
}

impl Layout {
    /// Layout with the default directory names under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &DispenserConfig::default())
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &DispenserConfig) -> Self {
        let root = root.into();
        Self {
            available_dir: root.join(&config.available_dir),
            used_dir: root.join(&config.used_dir),
            builds_dir: root.join(&config.builds_dir),
            devkit_dir: root.join(&config.devkit_dir),
            root,
        }
    }

    /// Create the directories a dispense writes into
    ///
    /// Only `used/` and `builds/` are created; the available pool and the dev
    /// kits are provisioned by operators.
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in [&self.used_dir, &self.builds_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        fs_error::io_error(format!(
            "Failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() {
        let layout = Layout::new("/srv/dispenser");
        assert_eq!(layout.available_dir, PathBuf::from("/srv/dispenser/available"));
        assert_eq!(layout.used_dir, PathBuf::from("/srv/dispenser/used"));
        assert_eq!(layout.builds_dir, PathBuf::from("/srv/dispenser/builds"));
        assert_eq!(layout.devkit_dir, PathBuf::from("/srv/dispenser/dev-kit"));
    }

    #[test]
    fn test_layout_from_config() {
        let config = DispenserConfig {
            builds_dir: PathBuf::from("out/zips"),
            ..DispenserConfig::default()
        };
        let layout = Layout::from_config("/srv", &config);
        assert_eq!(layout.builds_dir, PathBuf::from("/srv/out/zips"));
    }

    #[test]
    fn test_ensure_output_dirs() {
        let temp = TempDir::new().unwrap();
        let layout = Layout::new(temp.path());
        layout.ensure_output_dirs().unwrap();

        assert!(layout.used_dir.is_dir());
        assert!(layout.builds_dir.is_dir());
        assert!(!layout.available_dir.exists());

        // Idempotent
        layout.ensure_output_dirs().unwrap();
    }
}
