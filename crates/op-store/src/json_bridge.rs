use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use op_core::{CURRENT_VERSION, is_compatible_version};

use crate::error::{Result, StoreError};
use crate::selections::Selections;
use crate::store::Store;

/// File form of one profile's selections.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SelectionsFile {
    pub version: String,
    pub profile: String,
    pub selections: Selections,
}

impl Store {
    /// Import a selections file into `profile`. The selections must derive a
    /// valid type; partial drafts are not imported.
    pub fn import_json_file(&self, profile: &str, path: &Path) -> Result<Selections> {
        let json = fs::read_to_string(path).map_err(|e| {
            StoreError::InvalidData(format!("failed to read {}: {e}", path.display()))
        })?;
        self.import_json_str(profile, &json)
    }

    pub fn import_json_str(&self, profile: &str, json: &str) -> Result<Selections> {
        let file: SelectionsFile = serde_json::from_str(json)?;
        if !is_compatible_version(&file.version) {
            return Err(StoreError::InvalidData(format!(
                "unsupported selections file version '{}'",
                file.version
            )));
        }
        file.selections.to_seed()?.derive()?;
        self.save_selections(profile, &file.selections)?;
        Ok(file.selections)
    }

    pub fn export_json_file(&self, profile: &str, path: &Path) -> Result<()> {
        let json = self.export_json_string(profile)?;
        fs::write(path, json).map_err(|e| {
            StoreError::InvalidData(format!("failed to write {}: {e}", path.display()))
        })
    }

    pub fn export_json_string(&self, profile: &str) -> Result<String> {
        let selections = self
            .load_selections(profile)?
            .ok_or_else(|| StoreError::InvalidData(format!("no selections saved for '{profile}'")))?;
        let file = SelectionsFile {
            version: CURRENT_VERSION.to_string(),
            profile: profile.to_string(),
            selections,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}
