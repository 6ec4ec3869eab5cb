use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

/// Configuration for a single provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Override for the provider's endpoint (e.g. a proxy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: None, timeout_secs: None }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "google".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.google]
    /// api_key = "..."
    /// timeout_secs = 5
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `geocode configure <provider>` (e.g. `geocode configure google`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from the platform location, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geocoder", "geocode")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key, keeping its other settings, and set the
    /// default provider if none is set yet.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert_with(|| ProviderConfig::new(api_key));

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some_and(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::Google, "GOOGLE_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::Google);

        let key = cfg.provider_api_key(ProviderId::Google);
        assert_eq!(key, Some("GOOGLE_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::Google));
    }

    #[test]
    fn upsert_keeps_endpoint_overrides() {
        let mut cfg = Config::default();
        cfg.providers.insert(
            "google".into(),
            ProviderConfig {
                api_key: "OLD".into(),
                base_url: Some("http://localhost:8080/geocode".into()),
                timeout_secs: Some(3),
            },
        );

        cfg.upsert_provider_api_key(ProviderId::Google, "NEW".into());

        let provider = cfg.provider_config(ProviderId::Google).expect("provider config");
        assert_eq!(provider.api_key, "NEW");
        assert_eq!(provider.base_url.as_deref(), Some("http://localhost:8080/geocode"));
        assert_eq!(provider.timeout_secs, Some(3));
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config { default_provider: Some("other".into()), ..Default::default() };
        assert!(cfg.default_provider_id().is_err());

        cfg.set_default_provider(ProviderId::Google);
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Google);
    }

    #[test]
    fn unknown_default_provider_is_rejected() {
        let cfg = Config { default_provider: Some("bing".into()), ..Default::default() };
        let err = cfg.default_provider_id().unwrap_err();
        assert!(err.to_string().contains("Unknown provider 'bing'"));
    }

    #[test]
    fn save_and_load_roundtrip_through_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Google, "KEY".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.default_provider.as_deref(), Some("google"));
        assert_eq!(loaded.provider_config(ProviderId::Google), cfg.provider_config(ProviderId::Google));
    }

    #[test]
    fn missing_file_loads_as_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert!(cfg.default_provider.is_none());
        assert!(cfg.providers.is_empty());
    }

    #[test]
    fn parses_optional_fields() {
        let cfg: Config = toml::from_str(
            r#"
            default_provider = "google"

            [providers.google]
            api_key = "abc"
            base_url = "http://127.0.0.1:9000/json"
            timeout_secs = 2
            "#,
        )
        .expect("valid toml");

        let google = cfg.provider_config(ProviderId::Google).expect("google section");
        assert_eq!(google.timeout_secs, Some(2));
        assert_eq!(google.base_url.as_deref(), Some("http://127.0.0.1:9000/json"));
    }
}
