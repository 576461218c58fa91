//! Dispenser configuration
//!
//! Configuration lives in an optional `dispenser.yaml` at the dispenser root.
//! Every field has a default matching the conventional layout:
//!
//! ```yaml
//! available_dir: available
//! used_dir: used
//! builds_dir: builds
//! devkit_dir: dev-kit
//! candidate_order: shuffled
//! archive_prefix: devkit
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};
use crate::identifier::Identifier;
use crate::pool::CandidateOrder;

/// Config filename looked up in the dispenser root
pub const CONFIG_FILE: &str = "dispenser.yaml";

/// Dispenser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispenserConfig {
    /// Directory holding `<platform>/<license>` files that can be reserved
    pub available_dir: PathBuf,

    /// Flat directory that reserved licenses are moved into
    pub used_dir: PathBuf,

    /// Directory generated archives are written to
    pub builds_dir: PathBuf,

    /// Directory holding dev kits as `<identifier>/` or `<identifier>.zip`
    pub devkit_dir: PathBuf,

    /// Order in which available licenses are tried
    pub candidate_order: CandidateOrder,

    /// Prefix of generated archive names
    pub archive_prefix: String,
}

impl Default for DispenserConfig {
    fn default() -> Self {
        Self {
            available_dir: PathBuf::from("available"),
            used_dir: PathBuf::from("used"),
            builds_dir: PathBuf::from("builds"),
            devkit_dir: PathBuf::from("dev-kit"),
            candidate_order: CandidateOrder::default(),
            archive_prefix: "devkit".to_string(),
        }
    }
}

impl DispenserConfig {
    /// Parse configuration from YAML content
    pub fn from_yaml(path: &Path, content: &str) -> Result<Self> {
        let parsed: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| config::parse_failed(path, e))?
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load configuration for a dispenser root
    ///
    /// An explicit `config_path` must exist. Without one, `dispenser.yaml` in
    /// `root` is used when present and defaults otherwise.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.join(CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| config::read_failed(&path, e))?;

        Self::from_yaml(&path, &content)
    }

    /// Check that directory names stay inside the root and the prefix is name-safe
    pub fn validate(&self) -> Result<()> {
        for (field, dir) in [
            ("available_dir", &self.available_dir),
            ("used_dir", &self.used_dir),
            ("builds_dir", &self.builds_dir),
            ("devkit_dir", &self.devkit_dir),
        ] {
            validate_relative_dir(field, dir)?;
        }

        let available = normalized(&self.available_dir);
        let used = normalized(&self.used_dir);
        if available == used {
            return Err(config::invalid(
                "available_dir and used_dir must be different directories",
            ));
        }
        if used.starts_with(&available) || available.starts_with(&used) {
            return Err(config::invalid(format!(
                "available_dir '{}' and used_dir '{}' must not be nested in each other",
                self.available_dir.display(),
                self.used_dir.display()
            )));
        }

        Identifier::parse(&self.archive_prefix).map_err(|_| {
            config::invalid(format!(
                "archive_prefix '{}' may only contain A-Z, a-z, 0-9, '.', '_' and '-'",
                self.archive_prefix
            ))
        })?;

        Ok(())
    }
}

/// Relative directory with `.` components dropped
fn normalized(dir: &Path) -> PathBuf {
    dir.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn validate_relative_dir(field: &str, dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(config::invalid(format!("{field} must not be empty")));
    }

    let escapes = dir
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(config::invalid(format!(
            "{field} '{}' must be a relative path inside the dispenser root",
            dir.display()
        )));
    }

    Ok(())
}
