//! Core library for the `geocode` client.
//!
//! This crate defines:
//! - Navigation over a geocode response ([`ResultAccessor`])
//! - Abstraction over geocoding providers, with a Google backend
//! - The [`Geocoder`] facade callers use for lookups
//! - Configuration & credentials handling
//!
//! It is used by `geocoder-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod model;
pub mod parser;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use error::GeocodeError;
pub use geocoder::{Geocoder, encode_address};
pub use model::{
    AddressComponent, ComponentKind, LookupRequest, MAX_SELECTABLE_RESULTS, NameForm, Ordinal,
    RawGeocodeResponse, RawResult, Viewport,
};
pub use parser::ResultAccessor;
pub use provider::{GeocodeProvider, ProviderId, google::GoogleGeocodeProvider};
