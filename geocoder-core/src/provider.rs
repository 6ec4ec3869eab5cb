use crate::{
    Config, ProviderConfig, ResultAccessor, error::Result, provider::google::GoogleGeocodeProvider,
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod google;

/// Per-request timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Google,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Google => "google",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Google]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "google" => Ok(ProviderId::Google),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: google."
            )),
        }
    }
}

/// A geocoding backend.
///
/// Each call performs exactly one request and resolves once it completes or
/// fails. No retries, no caching.
#[async_trait]
pub trait GeocodeProvider: Send + Sync + Debug {
    /// Look up an address. `encoded_address` is already URL-encoded and is sent as is.
    async fn query_address(&self, encoded_address: &str) -> Result<ResultAccessor>;

    async fn query_coordinates(&self, lat: f64, lng: f64) -> Result<ResultAccessor>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn GeocodeProvider>> {
    let provider_cfg = config
        .provider_config(id)
        .filter(|cfg| !cfg.api_key.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured for provider '{id}'.\n\
                 Hint: run `geocode configure {id}` and enter your API key."
            )
        })?;

    let boxed: Box<dyn GeocodeProvider> = match id {
        ProviderId::Google => Box::new(google_from_config(provider_cfg)?),
    };

    Ok(boxed)
}

/// Apply the optional endpoint and timeout overrides of a provider section.
fn google_from_config(provider_cfg: &ProviderConfig) -> anyhow::Result<GoogleGeocodeProvider> {
    let timeout = match provider_cfg.timeout_secs {
        Some(0) => {
            return Err(anyhow::anyhow!(
                "Invalid timeout_secs = 0 for provider '{}'.\n\
                 Hint: set a positive number of seconds or remove the key to use the default ({}s).",
                ProviderId::Google,
                DEFAULT_TIMEOUT.as_secs()
            ));
        }
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_TIMEOUT,
    };

    let mut provider =
        GoogleGeocodeProvider::new(provider_cfg.api_key.clone()).with_timeout(timeout);
    if let Some(base_url) = &provider_cfg.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(provider)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn GeocodeProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
        assert_eq!(ProviderId::try_from("Google").unwrap(), ProviderId::Google);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("nominatim").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::Google, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn default_provider_from_config_errors_when_not_set() {
        let cfg = Config::default();
        let err = default_provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default provider configured"));
        assert!(msg.contains("Hint: run `geocode configure"));
    }

    #[test]
    fn google_from_config_applies_overrides() {
        let cfg = ProviderConfig {
            api_key: "KEY".into(),
            base_url: Some("http://127.0.0.1:9000/json?client=abc".into()),
            timeout_secs: Some(3),
        };

        let provider = google_from_config(&cfg).expect("valid provider config");
        assert_eq!(provider.base_url(), "http://127.0.0.1:9000/json?client=abc");
        assert_eq!(provider.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn google_from_config_uses_defaults() {
        let provider = google_from_config(&ProviderConfig::new("KEY".into())).expect("valid");
        assert_eq!(provider.base_url(), google::GOOGLE_GEOCODE_URL);
        assert_eq!(provider.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Google, "KEY".into());
        if let Some(google) = cfg.providers.get_mut("google") {
            google.timeout_secs = Some(0);
        }

        let err = provider_from_config(ProviderId::Google, &cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid timeout_secs = 0"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn default_provider_from_config_works_when_set_and_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Google, "KEY".to_string());

        let provider = default_provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
