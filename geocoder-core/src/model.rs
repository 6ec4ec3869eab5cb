use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;

/// Parsed body of a geocode response.
///
/// Only `results` is needed by the accessor; `status` and `error_message`
/// are the Google service-level fields and are checked by the provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawGeocodeResponse {
    #[serde(default)]
    pub results: Vec<RawResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One candidate match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    pub fn name(&self, form: NameForm) -> &str {
        match form {
            NameForm::Long => &self.long_name,
            NameForm::Short => &self.short_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    pub viewport: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

/// Which variant of a component name to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameForm {
    #[default]
    Long,
    Short,
}

impl NameForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameForm::Long => "long",
            NameForm::Short => "short",
        }
    }
}

impl fmt::Display for NameForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameForm {
    type Err = GeocodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" => Ok(NameForm::Long),
            "short" => Ok(NameForm::Short),
            _ => Err(GeocodeError::InvalidForm(s.to_string())),
        }
    }
}

/// Address fields exposed by the accessor, each bound to one component tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    StreetNumber,
    Route,
    Locality,
    AdministrativeAreaLevel1,
    Country,
}

impl ComponentKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentKind::StreetNumber => "street_number",
            ComponentKind::Route => "route",
            ComponentKind::Locality => "locality",
            ComponentKind::AdministrativeAreaLevel1 => "administrative_area_level_1",
            ComponentKind::Country => "country",
        }
    }
}

/// Bounding box suggested for displaying a result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub ne_lat: f64,
    pub ne_lng: f64,
    pub sw_lat: f64,
    pub sw_lng: f64,
}

impl From<&Bounds> for Viewport {
    fn from(b: &Bounds) -> Self {
        Self {
            ne_lat: b.northeast.lat,
            ne_lng: b.northeast.lng,
            sw_lat: b.southwest.lat,
            sw_lng: b.southwest.lng,
        }
    }
}

/// Upper bound on selectable results; indices at or past it never become active.
pub const MAX_SELECTABLE_RESULTS: usize = 10;

/// Friendly names for the selectable result positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ordinal {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
}

impl Ordinal {
    pub const fn all() -> &'static [Ordinal; MAX_SELECTABLE_RESULTS] {
        &[
            Ordinal::First,
            Ordinal::Second,
            Ordinal::Third,
            Ordinal::Fourth,
            Ordinal::Fifth,
            Ordinal::Sixth,
            Ordinal::Seventh,
            Ordinal::Eighth,
            Ordinal::Ninth,
            Ordinal::Tenth,
        ]
    }

    /// Zero-based position within `results`.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ordinal::First => "first",
            Ordinal::Second => "second",
            Ordinal::Third => "third",
            Ordinal::Fourth => "fourth",
            Ordinal::Fifth => "fifth",
            Ordinal::Sixth => "sixth",
            Ordinal::Seventh => "seventh",
            Ordinal::Eighth => "eighth",
            Ordinal::Ninth => "ninth",
            Ordinal::Tenth => "tenth",
        }
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ordinal {
    type Err = GeocodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Ordinal::all()
            .iter()
            .copied()
            .find(|o| o.as_str() == lower)
            .ok_or_else(|| GeocodeError::InvalidOrdinal(s.to_string()))
    }
}

/// A complete lookup, for callers that prefer one immutable value over
/// the facade's staged setters.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    /// Address that is already URL-encoded.
    Address(String),
    Coordinates { lat: f64, lng: f64 },
}
