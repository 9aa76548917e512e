//! Alias store for persisting user-taught field aliases.
//!
//! # Storage Format
//!
//! A single JSON file:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "saved_at": "2025-01-01T12:00:00Z",
//!   "aliases": [
//!     { "owner_type": "Player", "source_field": "Armor", "target_field": "Defense" }
//!   ]
//! }
//! ```
//!
//! Owner types and field names compare case-insensitively. The store is only
//! read during matching; changes are made explicitly and written with
//! [`AliasStore::save`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use fieldmatch_model::{Match, TypeName, eq_ignore_case};

use crate::lookup::AliasLookup;

/// Current alias file format version.
pub const ALIAS_STORE_VERSION: &str = "1.0";

/// One taught alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub owner_type: TypeName,
    pub source_field: String,
    pub target_field: String,
}

impl AliasEntry {
    fn is_for(&self, owner: &TypeName, source_field: &str) -> bool {
        eq_ignore_case(self.owner_type.as_str(), owner.as_str())
            && eq_ignore_case(&self.source_field, source_field)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAliases {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    aliases: Vec<AliasEntry>,
}

fn default_version() -> String {
    ALIAS_STORE_VERSION.to_string()
}

/// File-backed alias table.
#[derive(Debug, Clone)]
pub struct AliasStore {
    path: PathBuf,
    aliases: Vec<AliasEntry>,
    saved_at: Option<DateTime<Utc>>,
}

impl AliasStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "alias store not found, starting empty");
            return Ok(Self {
                path,
                aliases: Vec::new(),
                saved_at: None,
            });
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read aliases from {}", path.display()))?;
        let stored: StoredAliases = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse aliases from {}", path.display()))?;
        debug!(
            path = %path.display(),
            version = %stored.version,
            aliases = stored.aliases.len(),
            "loaded alias store"
        );
        Ok(Self {
            path,
            aliases: stored.aliases,
            saved_at: stored.saved_at,
        })
    }

    /// Writes the store back to its file, creating parent directories.
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create alias directory: {}", parent.display())
            })?;
        }
        let saved_at = Utc::now();
        let stored = StoredAliases {
            version: default_version(),
            saved_at: Some(saved_at),
            aliases: self.aliases.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .with_context(|| format!("Failed to serialize aliases for {}", self.path.display()))?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write aliases to {}", self.path.display()))?;
        self.saved_at = Some(saved_at);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Adds an alias, replacing any existing one for the same owner and
    /// source field. Returns the replaced target name.
    pub fn add(
        &mut self,
        owner: TypeName,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Option<String> {
        let source_field = source_field.into();
        let replaced = self
            .aliases
            .iter()
            .position(|entry| entry.is_for(&owner, &source_field))
            .map(|index| self.aliases.remove(index).target_field);
        self.aliases.push(AliasEntry {
            owner_type: owner,
            source_field,
            target_field: target_field.into(),
        });
        replaced
    }

    /// Removes the alias for an owner and source field.
    pub fn remove(&mut self, owner: &TypeName, source_field: &str) -> bool {
        let before = self.aliases.len();
        self.aliases.retain(|entry| !entry.is_for(owner, source_field));
        self.aliases.len() != before
    }

    pub fn has_alias(&self, owner: &TypeName, source_field: &str, target_field: &str) -> bool {
        self.aliases.iter().any(|entry| {
            entry.is_for(owner, source_field) && eq_ignore_case(&entry.target_field, target_field)
        })
    }

    pub fn list(&self) -> &[AliasEntry] {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Remembers an accepted match so later runs pair the same names again.
    pub fn teach(&mut self, accepted: &Match, owner: &TypeName) -> Option<String> {
        self.add(
            owner.clone(),
            accepted.source.display_name.as_str(),
            accepted.target.display_name.as_str(),
        )
    }
}

impl AliasLookup for AliasStore {
    fn alias_for(&self, owner_type: &TypeName, source_name: &str) -> Option<String> {
        self.aliases
            .iter()
            .find(|entry| entry.is_for(owner_type, source_name))
            .map(|entry| entry.target_field.clone())
    }
}
