use std::path::{Path, PathBuf};
use std::{env, fs};

use op_core::OpType;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::selections::Selections;
use crate::store::{HistoryEntry, Store};

pub const DEFAULT_PROFILE: &str = "default";
pub const DATABASE_FILE: &str = "selections.db";

/// Default base directory for all op storage.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".op-types")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Sanitize a profile name for storage: anything outside `[A-Za-z0-9_-]`
/// becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Resolve the active profile.
///
/// Priority chain:
/// 1. Explicit `--profile` name
/// 2. `default_profile` from config.toml
/// 3. `"default"`
fn resolve_profile(explicit: Option<&str>, config: &StoreConfig) -> String {
    [explicit, config.default_profile.as_deref()]
        .into_iter()
        .flatten()
        .map(sanitize_name)
        .find(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// The store bound to one active profile.
///
/// Layout:
/// ```text
/// ~/.op-types/
/// ├── config.toml      (optional)
/// └── selections.db
/// ```
pub struct ProfileStore {
    store: Store,
    profile: String,
    base_dir: Option<PathBuf>,
}

impl ProfileStore {
    /// Open the store, creating the base directory as needed.
    /// `profile`: explicit profile name (overrides config).
    /// `base_dir`: override the base directory (for testing).
    pub fn open(profile: Option<&str>, base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        fs::create_dir_all(&base).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", base.display()))
        })?;

        let config = StoreConfig::load(&base)?;
        let profile = resolve_profile(profile, &config);
        let store = Store::open(&base.join(DATABASE_FILE))?;
        tracing::debug!("active profile '{profile}'");

        Ok(Self {
            store,
            profile,
            base_dir: Some(base),
        })
    }

    /// Open with an in-memory store (for testing).
    pub fn open_in_memory(profile: Option<&str>) -> Result<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
            profile: resolve_profile(profile, &StoreConfig::default()),
            base_dir: None,
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn load(&self) -> Result<Option<Selections>> {
        self.store.load_selections(&self.profile)
    }

    pub fn save(&self, selections: &Selections) -> Result<()> {
        self.store.save_selections(&self.profile, selections)?;
        self.store.set_metadata("last_profile", &self.profile)
    }

    /// Derive the type the saved selections describe.
    pub fn derive(&self) -> Result<OpType> {
        let selections = self.load()?.ok_or_else(|| {
            StoreError::InvalidData(format!("no selections saved for '{}'", self.profile))
        })?;
        Ok(selections.to_seed()?.derive()?)
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.store.history(&self.profile)
    }

    pub fn list_profiles(&self) -> Result<Vec<String>> {
        self.store.list_profiles()
    }

    pub fn import_json_file(&self, path: &Path) -> Result<Selections> {
        self.store.import_json_file(&self.profile, path)
    }

    pub fn export_json_file(&self, path: &Path) -> Result<()> {
        self.store.export_json_file(&self.profile, path)
    }
}
