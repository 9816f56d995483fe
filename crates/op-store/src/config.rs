use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_FILE: &str = "config.toml";

/// Settings read from `<base>/config.toml`. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub default_profile: Option<String>,
}

impl StoreConfig {
    /// Read the config from `base_dir`. A missing file yields the defaults.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_parse() {
        let config = StoreConfig::parse("default_profile = \"work\"\n").unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("work"));
    }

    #[test]
    fn test_empty_and_unknown_keys() {
        assert_eq!(StoreConfig::parse("").unwrap(), StoreConfig::default());
        assert_eq!(
            StoreConfig::parse("colour = \"blue\"").unwrap(),
            StoreConfig::default()
        );
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            StoreConfig::parse("default_profile = "),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StoreConfig::load(dir.path()).unwrap(), StoreConfig::default());

        fs::write(dir.path().join(CONFIG_FILE), "default_profile = \"home\"").unwrap();
        assert_eq!(
            StoreConfig::load(dir.path()).unwrap().default_profile.as_deref(),
            Some("home")
        );
    }
}
