use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by providers and the [`Geocoder`](crate::Geocoder) facade.
///
/// Missing data (no matching component, no active result) is not represented
/// here: accessors return `None` for those.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// `lookup()` was called before an address or coordinates were set.
    #[error(
        "No lookup criteria set.\n\
         Hint: call `set_address` or `set_coordinates` before `lookup`."
    )]
    NoCriteriaSet,

    /// Transport failure, non-success status, service-level error or unparsable body.
    #[error("Geocode request failed: {0}")]
    RequestFailed(String),

    #[error("Geocode request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// A name form other than `long` or `short`.
    #[error("Invalid name form '{0}'. Supported forms: long, short.")]
    InvalidForm(String),

    #[error("Invalid result ordinal '{0}'. Supported ordinals: first .. tenth.")]
    InvalidOrdinal(String),
}

impl GeocodeError {
    /// Map a reqwest failure onto the taxonomy, keeping timeouts distinct.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration, what: &str) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout(timeout)
        } else {
            GeocodeError::RequestFailed(format!("{what}: {err}"))
        }
    }
}

pub type Result<T, E = GeocodeError> = std::result::Result<T, E>;
