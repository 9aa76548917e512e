//! Persisted matcher preferences.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fieldmatch_model::{SolverConfig, SolverKind};

use crate::defaults::SynonymTable;

/// User settings for matching runs.
///
/// Every field has a default, so partial files load fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherSettings {
    /// Which assignment solver to use.
    pub solver: SolverKind,
    /// Whether the built-in name mappings take part in scoring.
    pub use_default_mappings: bool,
    /// Whether built-in mappings also hold in reverse.
    pub symmetric_defaults: bool,
    /// Alias store consulted when no path is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases_path: Option<PathBuf>,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            solver: SolverKind::default(),
            use_default_mappings: true,
            symmetric_defaults: true,
            aliases_path: None,
        }
    }
}

impl MatcherSettings {
    /// Loads settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            solver: self.solver,
        }
    }

    /// The default-mapping table these settings ask for, if any.
    #[must_use]
    pub fn default_mappings(&self) -> Option<SynonymTable> {
        if !self.use_default_mappings {
            return None;
        }
        Some(if self.symmetric_defaults {
            SynonymTable::builtin()
        } else {
            SynonymTable::builtin_one_way()
        })
    }
}
