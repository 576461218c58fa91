//! Command implementations for the dispenser CLI

pub mod completions;
pub mod dispense;
pub mod inventory;
pub mod release;

use std::path::PathBuf;

use devkit_dispenser::error::fs as fs_error;
use devkit_dispenser::{DispenserConfig, Layout, Result};

/// Root and configuration shared by all commands
#[derive(Debug, Clone)]
pub struct Context {
    root: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Context {
    pub fn new(root: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self { root, config }
    }

    /// Dispenser root from the CLI argument or the current directory
    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().map_err(|e| {
                fs_error::io_error(format!("Failed to get current directory: {}", e))
            }),
        }
    }

    /// Load the configuration and resolve the directory layout
    pub fn load(&self) -> Result<(DispenserConfig, Layout)> {
        let root = self.root()?;
        let config = DispenserConfig::load(&root, self.config.as_deref())?;
        let layout = Layout::from_config(root, &config);
        Ok((config, layout))
    }
}
