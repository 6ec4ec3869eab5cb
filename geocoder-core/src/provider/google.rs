use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, warn};

use crate::{
    error::{GeocodeError, Result},
    model::RawGeocodeResponse,
    parser::ResultAccessor,
};

use super::{DEFAULT_TIMEOUT, GeocodeProvider};

pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Service statuses that still carry a usable (possibly empty) result list.
const ACCEPTED_STATUSES: &[&str] = &["OK", "ZERO_RESULTS"];

#[derive(Debug, Clone)]
pub struct GoogleGeocodeProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl GoogleGeocodeProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: GOOGLE_GEOCODE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Point the provider at another endpoint speaking the same JSON format.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, request: RequestBuilder, what: &str) -> Result<ResultAccessor> {
        let res = request
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                GeocodeError::from_transport(e, self.timeout, &format!("Failed to send {what} request"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            GeocodeError::from_transport(e, self.timeout, &format!("Failed to read {what} response body"))
        })?;

        if !status.is_success() {
            return Err(GeocodeError::RequestFailed(format!(
                "Google {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: RawGeocodeResponse = serde_json::from_str(&body).map_err(|e| {
            GeocodeError::RequestFailed(format!("Failed to parse Google {what} JSON: {e}"))
        })?;

        check_service_status(&parsed, what)?;

        debug!(results = parsed.results.len(), "google {what} lookup completed");
        Ok(ResultAccessor::new(parsed))
    }
}

#[async_trait]
impl GeocodeProvider for GoogleGeocodeProvider {
    async fn query_address(&self, encoded_address: &str) -> Result<ResultAccessor> {
        debug!(base_url = %self.base_url, address = encoded_address, "google address lookup");

        let url = address_url(&self.base_url, encoded_address)?;
        self.fetch(self.http.get(url), "address").await
    }

    async fn query_coordinates(&self, lat: f64, lng: f64) -> Result<ResultAccessor> {
        debug!(base_url = %self.base_url, lat, lng, "google coordinate lookup");

        let request = self
            .http
            .get(&self.base_url)
            .query(&[("lat", lat.to_string()), ("lng", lng.to_string())]);
        self.fetch(request, "coordinate").await
    }
}

/// Append `address=<encoded>` to the base URL, keeping any query it already has.
/// The address is already encoded; `.query()` would encode it a second time.
fn address_url(base_url: &str, encoded_address: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| {
        GeocodeError::RequestFailed(format!("Invalid geocode base URL '{base_url}': {e}"))
    })?;

    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&address={encoded_address}"),
        _ => format!("address={encoded_address}"),
    };
    url.set_query(Some(&query));
    Ok(url)
}

fn check_service_status(parsed: &RawGeocodeResponse, what: &str) -> Result<()> {
    match parsed.status.as_deref() {
        None => Ok(()),
        Some(s) if ACCEPTED_STATUSES.contains(&s) => Ok(()),
        Some(s) => {
            let detail = parsed.error_message.as_deref().unwrap_or("no error message");
            warn!(status = s, "google {what} lookup rejected by service");
            Err(GeocodeError::RequestFailed(format!(
                "Google {what} lookup returned status {s}: {detail}"
            )))
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
