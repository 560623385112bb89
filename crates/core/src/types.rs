//! Domain types for the raw place record as delivered by a places lookup.
//!
//! Every field is optional. Decoding is lenient: a field carrying the wrong
//! JSON type is dropped with a warning instead of rejecting the whole record.

use crate::catalog::{Service, SERVICE_CATALOG};
use crate::error::{Error, Result};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single place (business or location) record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub place_id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub formatted_address: Option<String>,

    /// Display phone number.
    #[serde(default, rename = "formatted_phone_number", deserialize_with = "lenient")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub website: Option<String>,

    /// Link to the place on the maps provider.
    #[serde(default, rename = "url", deserialize_with = "lenient")]
    pub maps_url: Option<String>,

    /// Average rating, nominally 0 to 5.
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub user_ratings_total: Option<u64>,

    /// Price tier, nominally 0 (free) to 4 (very expensive).
    #[serde(default, deserialize_with = "lenient")]
    pub price_level: Option<i64>,

    /// Raw status such as `OPERATIONAL`; unknown values are kept verbatim.
    #[serde(default, deserialize_with = "lenient")]
    pub business_status: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, deserialize_with = "lenient")]
    pub plus_code: Option<PlusCode>,

    /// Category slugs in source order.
    #[serde(default, rename = "all_types", deserialize_with = "lenient_list")]
    pub types: Vec<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub editorial_summary: Option<EditorialSummary>,

    #[serde(default, rename = "opening_hours_parsed", deserialize_with = "lenient")]
    pub opening_hours: Option<OpeningHours>,

    /// Auxiliary hour sets (delivery, pickup and the like).
    #[serde(default, deserialize_with = "lenient")]
    pub secondary_opening_hours: Option<OpeningHours>,

    #[serde(default, rename = "formatted_reviews", deserialize_with = "lenient_list")]
    pub reviews: Vec<Review>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub photo_urls: Vec<String>,

    /// Capability flags; these are top-level keys of the source record.
    #[serde(flatten)]
    pub service_flags: ServiceFlags,
}

impl PlaceRecord {
    /// Create an empty record with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Decode a record from an already parsed JSON value.
    ///
    /// Fails with [`Error::InvalidRecord`] when the value is not an object.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidRecord(format!(
                "expected a JSON object, found {}",
                json_kind(value)
            )));
        }

        Self::deserialize(value).map_err(|e| Error::InvalidRecord(e.to_string()))
    }

    /// Decode a record from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::InvalidRecord(format!("malformed JSON: {}", e)))?;
        Self::from_value(&value)
    }
}

/// Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlusCode {
    #[serde(default, deserialize_with = "lenient")]
    pub global_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorialSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub overview: Option<String>,
}

/// Opening hours as pre-rendered display lines.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpeningHours {
    #[serde(default, deserialize_with = "lenient")]
    pub open_now: Option<bool>,

    /// One line per weekday, as shown by the source (normally seven).
    #[serde(default, deserialize_with = "lenient_list")]
    pub weekday_text: Vec<String>,
}

/// A user review.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "lenient")]
    pub author_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,

    /// Absolute date string.
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_time: Option<String>,

    /// Relative date such as "2 weeks ago".
    #[serde(default, deserialize_with = "lenient")]
    pub relative_time_description: Option<String>,
}

/// Known capability flags. A service missing from the map is unknown, which is
/// different from a service reported as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFlags(BTreeMap<Service, bool>);

impl ServiceFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for constructing records in code.
    pub fn with(mut self, service: Service, value: bool) -> Self {
        self.0.insert(service, value);
        self
    }

    pub fn get(&self, service: Service) -> Option<bool> {
        self.0.get(&service).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Pick the catalog keys out of a JSON object.
    ///
    /// Keys with a non-boolean value are treated as unknown.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut flags = Self::new();

        for descriptor in &SERVICE_CATALOG {
            match map.get(descriptor.source_key) {
                Some(Value::Bool(value)) => {
                    flags.0.insert(descriptor.service, *value);
                }
                None | Some(Value::Null) => {}
                Some(other) => {
                    log::warn!(
                        "Ignoring non-boolean service flag '{}': {}",
                        descriptor.source_key,
                        other
                    );
                }
            }
        }

        flags
    }
}

impl<'de> Deserialize<'de> for ServiceFlags {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(&map))
    }
}

/// Decode an optional field, dropping values of the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            log::warn!("Ignoring malformed field: {}", e);
            Ok(None)
        }
    }
}

/// Like [`lenient`], but for lists; a malformed list decodes as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
