//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI config directory"))
        .join("curio")
        .join(CONFIG_FILE_NAME)
}

pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("https://") || value.starts_with("http://")
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Resolve the effective profile name: explicit flag, then
    /// `CURIO_PROFILE`, then the persisted active profile, then "default".
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        if let Some(profile) = normalize_profile_name(explicit) {
            return profile;
        }
        if let Some(profile) =
            normalize_profile_name(std::env::var("CURIO_PROFILE").ok().as_deref())
        {
            return profile;
        }
        if let Some(profile) = normalize_profile_name(self.active_profile.as_deref()) {
            return profile;
        }
        "default".to_string()
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn upsert_profile(&mut self, name: &str, profile: CliProfile) {
        self.profiles.insert(name.to_string(), profile);
    }

    /// Resolve the API base URL for a profile: `CURIO_API_BASE_URL`
    /// overrides the persisted value.
    pub fn resolve_api_base_url(&self, profile_name: &str) -> Option<String> {
        if let Some(url) = normalize_text_option(std::env::var("CURIO_API_BASE_URL").ok()) {
            return Some(url);
        }
        self.profile(profile_name)
            .and_then(|profile| normalize_text_option(profile.api_base_url.clone()))
    }

    fn normalize(&mut self) {
        if self.version == 0 {
            self.version = default_config_version();
        }
        self.active_profile = normalize_text_option(self.active_profile.take());
        for profile in self.profiles.values_mut() {
            profile.api_base_url = normalize_text_option(profile.api_base_url.take());
        }
        self.profiles.retain(|name, _| !name.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_profile_name_prefers_explicit() {
        let mut config = CliProfilesConfig::default();
        config.active_profile = Some("stored".to_string());
        assert_eq!(config.resolve_profile_name(Some("flag")), "flag");
    }

    #[test]
    fn resolve_profile_name_falls_back_to_default() {
        let config = CliProfilesConfig::default();
        assert_eq!(config.resolve_profile_name(None), "default");
    }

    #[test]
    fn normalize_drops_empty_values() {
        let mut config = CliProfilesConfig {
            version: 0,
            active_profile: Some("  ".to_string()),
            profiles: BTreeMap::new(),
        };
        config.upsert_profile(
            "default",
            CliProfile {
                api_base_url: Some("   ".to_string()),
            },
        );
        config.normalize();
        assert_eq!(config.version, 1);
        assert_eq!(config.active_profile, None);
        assert_eq!(config.profile("default").unwrap().api_base_url, None);
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli-config.json");

        let mut config = CliProfilesConfig::default();
        config.active_profile = Some("staging".to_string());
        config.upsert_profile(
            "staging",
            CliProfile {
                api_base_url: Some("https://staging.example.com".to_string()),
            },
        );
        config.save_to_path(&path).unwrap();

        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.active_profile.as_deref(), Some("staging"));
        assert_eq!(
            loaded.profile("staging").unwrap().api_base_url.as_deref(),
            Some("https://staging.example.com")
        );
    }

    #[test]
    fn is_http_url_accepts_valid_schemes() {
        assert!(is_http_url("http://localhost"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
    }
}
