use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use crate::{
    error::{GeocodeError, Result},
    model::LookupRequest,
    parser::ResultAccessor,
    provider::GeocodeProvider,
};

/// Everything except RFC 3986 unreserved characters gets encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// URL-encode an address the way [`Geocoder::set_address`] stores it.
pub fn encode_address(address: &str) -> String {
    utf8_percent_encode(address, QUERY_VALUE).to_string()
}

/// Entry point for lookups.
///
/// Holds a provider chosen at construction and the criteria for the next
/// [`lookup`](Geocoder::lookup). The staged criteria are plain fields, so one
/// instance serves one lookup at a time; the `&mut self` setters make
/// overlapping use a compile error rather than a race. Use
/// [`lookup_request`](Geocoder::lookup_request) to pass criteria explicitly.
#[derive(Debug)]
pub struct Geocoder {
    provider: Box<dyn GeocodeProvider>,
    address: Option<String>,
    coordinates: Option<(f64, f64)>,
}

impl Geocoder {
    pub fn new(provider: Box<dyn GeocodeProvider>) -> Self {
        Self { provider, address: None, coordinates: None }
    }

    /// Store an encoded copy of `address` for the next lookup.
    pub fn set_address(&mut self, address: &str) -> &mut Self {
        self.address = Some(encode_address(address));
        self
    }

    /// Store coordinates for the next lookup. Does not clear a previously set address.
    pub fn set_coordinates(&mut self, lat: f64, lng: f64) -> &mut Self {
        self.coordinates = Some((lat, lng));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.address = None;
        self.coordinates = None;
        self
    }

    /// The request `lookup()` would send: the address wins over coordinates.
    pub fn pending_request(&self) -> Option<LookupRequest> {
        match (&self.address, self.coordinates) {
            (Some(address), _) => Some(LookupRequest::Address(address.clone())),
            (None, Some((lat, lng))) => Some(LookupRequest::Coordinates { lat, lng }),
            (None, None) => None,
        }
    }

    pub async fn lookup(&self) -> Result<ResultAccessor> {
        let request = self.pending_request().ok_or(GeocodeError::NoCriteriaSet)?;
        self.lookup_request(&request).await
    }

    pub async fn lookup_request(&self, request: &LookupRequest) -> Result<ResultAccessor> {
        debug!(?request, "geocode lookup");
        match request {
            LookupRequest::Address(address) => self.provider.query_address(address).await,
            LookupRequest::Coordinates { lat, lng } => {
                self.provider.query_coordinates(*lat, *lng).await
            }
        }
    }
}
