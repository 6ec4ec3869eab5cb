//! Navigation over one geocode response.
//!
//! A [`ResultAccessor`] owns the parsed response and remembers which result is
//! currently active. Selecting another result only moves that marker, so
//! switching back and forth between candidates is cheap and lossless.

use crate::{
    error::{GeocodeError, Result},
    model::{
        ComponentKind, LatLng, MAX_SELECTABLE_RESULTS, NameForm, Ordinal, RawGeocodeResponse,
        RawResult, Viewport,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct ResultAccessor {
    raw: RawGeocodeResponse,
    active: Option<usize>,
}

impl ResultAccessor {
    /// Wrap a response and make its first result active (if any).
    pub fn new(raw: RawGeocodeResponse) -> Self {
        let mut accessor = Self { raw, active: None };
        accessor.first();
        accessor
    }

    /// Parse a JSON body. A malformed body is a request failure, never an empty accessor.
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawGeocodeResponse = serde_json::from_str(body)
            .map_err(|e| GeocodeError::RequestFailed(format!("Failed to parse geocode JSON: {e}")))?;
        Ok(Self::new(raw))
    }

    pub fn raw(&self) -> &RawGeocodeResponse {
        &self.raw
    }

    pub fn into_raw(self) -> RawGeocodeResponse {
        self.raw
    }

    /// Number of results in the response, including those past the selectable bound.
    pub fn len(&self) -> usize {
        self.raw.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.results.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&RawResult> {
        self.active.and_then(|i| self.raw.results.get(i))
    }

    // ---- selection ----

    /// Make the result at `index` active. Out-of-range indices (or indices at
    /// or beyond [`MAX_SELECTABLE_RESULTS`]) leave no result active.
    pub fn select(&mut self, index: usize) -> &mut Self {
        self.active = (index < MAX_SELECTABLE_RESULTS && index < self.raw.results.len())
            .then_some(index);
        self
    }

    pub fn select_ordinal(&mut self, ordinal: Ordinal) -> &mut Self {
        self.select(ordinal.index())
    }

    pub fn first(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::First)
    }

    pub fn second(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Second)
    }

    pub fn third(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Third)
    }

    pub fn fourth(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Fourth)
    }

    pub fn fifth(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Fifth)
    }

    pub fn sixth(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Sixth)
    }

    pub fn seventh(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Seventh)
    }

    pub fn eighth(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Eighth)
    }

    pub fn ninth(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Ninth)
    }

    pub fn tenth(&mut self) -> &mut Self {
        self.select_ordinal(Ordinal::Tenth)
    }

    // ---- address components ----

    /// Name of the first component of the active result tagged with `tag`.
    pub fn component_by_tag(&self, tag: &str, form: NameForm) -> Option<&str> {
        self.active()?
            .address_components
            .iter()
            .find(|c| c.has_type(tag))
            .map(|c| c.name(form))
    }

    pub fn component(&self, kind: ComponentKind, form: NameForm) -> Option<&str> {
        self.component_by_tag(kind.tag(), form)
    }

    pub fn number(&self, form: NameForm) -> Option<&str> {
        self.component(ComponentKind::StreetNumber, form)
    }

    pub fn short_number(&self) -> Option<&str> {
        self.number(NameForm::Short)
    }

    pub fn street(&self, form: NameForm) -> Option<&str> {
        self.component(ComponentKind::Route, form)
    }

    pub fn short_street(&self) -> Option<&str> {
        self.street(NameForm::Short)
    }

    pub fn city(&self, form: NameForm) -> Option<&str> {
        self.component(ComponentKind::Locality, form)
    }

    pub fn short_city(&self) -> Option<&str> {
        self.city(NameForm::Short)
    }

    pub fn state(&self, form: NameForm) -> Option<&str> {
        self.component(ComponentKind::AdministrativeAreaLevel1, form)
    }

    pub fn short_state(&self) -> Option<&str> {
        self.state(NameForm::Short)
    }

    /// Country of the active result, read from the `country` component.
    ///
    /// Earlier releases of this client read `locality` here, returning the city.
    /// That behavior is kept as [`ResultAccessor::locality_country`].
    pub fn country(&self, form: NameForm) -> Option<&str> {
        self.component(ComponentKind::Country, form)
    }

    pub fn short_country(&self) -> Option<&str> {
        self.country(NameForm::Short)
    }

    /// Legacy country lookup: reads the `locality` component, same as [`ResultAccessor::city`].
    pub fn locality_country(&self, form: NameForm) -> Option<&str> {
        self.component(ComponentKind::Locality, form)
    }

    // ---- whole-result fields ----

    pub fn address(&self) -> Option<&str> {
        self.active().map(|r| r.formatted_address.as_str())
    }

    pub fn location(&self) -> Option<LatLng> {
        self.active().map(|r| r.geometry.location)
    }

    pub fn lat(&self) -> Option<f64> {
        self.location().map(|l| l.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.location().map(|l| l.lng)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.active().map(|r| Viewport::from(&r.geometry.viewport))
    }

    /// Types of the active result itself (e.g. `street_address`); empty when none is active.
    pub fn result_types(&self) -> &[String] {
        self.active().map(|r| r.types.as_slice()).unwrap_or(&[])
    }
}

impl From<RawGeocodeResponse> for ResultAccessor {
    fn from(raw: RawGeocodeResponse) -> Self {
        Self::new(raw)
    }
}
