//! Raw user selections, stored exactly as typed.
//!
//! Nothing here is validated on save; parsing happens when the selections are
//! turned into a seed, so a half-filled form can be stored and resumed.

use serde::{Deserialize, Serialize};

use op_core::{OpError, OpTypeSeed};

use crate::error::{Result, StoreError};

pub const KEYS: [&str; 6] = [
    "observer",
    "decider",
    "single_observer",
    "modality",
    "animals",
    "social",
];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_observer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<String>,
}

impl Selections {
    pub fn from_seed(seed: &OpTypeSeed) -> Self {
        Self {
            observer: Some(seed.observer.label()),
            decider: Some(seed.decider.label()),
            single_observer: Some(seed.is_single_observer.to_string()),
            modality: Some(seed.modality.label()),
            animals: Some(seed.animal_stack.label()),
            social: Some(seed.social_type.label()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.slot(key).and_then(|v| v.as_deref())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let slot = self
            .slot_mut(key)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown selection key '{key}'")))?;
        *slot = Some(value.into());
        Ok(())
    }

    /// (key, value) pairs for every filled selection, in `KEYS` order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Parse every selection into a seed. A missing selection reports the
    /// key it belongs to.
    pub fn to_seed(&self) -> op_core::Result<OpTypeSeed> {
        let single = match self.single_observer.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(raw) => parse_flag(raw)?,
        };
        OpTypeSeed::from_labels(
            required(&self.observer, "observer")?,
            required(&self.decider, "decider")?,
            single,
            required(&self.modality, "modality")?,
            required(&self.animals, "animals")?,
            required(&self.social, "social")?,
        )
    }

    fn slot(&self, key: &str) -> Option<&Option<String>> {
        match key {
            "observer" => Some(&self.observer),
            "decider" => Some(&self.decider),
            "single_observer" => Some(&self.single_observer),
            "modality" => Some(&self.modality),
            "animals" => Some(&self.animals),
            "social" => Some(&self.social),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "observer" => Some(&mut self.observer),
            "decider" => Some(&mut self.decider),
            "single_observer" => Some(&mut self.single_observer),
            "modality" => Some(&mut self.modality),
            "animals" => Some(&mut self.animals),
            "social" => Some(&mut self.social),
            _ => None,
        }
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> op_core::Result<&'a str> {
    value.as_deref().ok_or(OpError::Validation {
        kind: key,
        raw: String::new(),
    })
}

fn parse_flag(raw: &str) -> op_core::Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "y" => Ok(true),
        "false" | "no" | "0" | "n" => Ok(false),
        _ => Err(OpError::Validation {
            kind: "single_observer",
            raw: raw.to_string(),
        }),
    }
}
