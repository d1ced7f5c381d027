use std::collections::BTreeMap;

use serde::Deserialize;

/// Property key carrying the collision severity.
pub const SEVERITY_KEY: &str = "severity";

/// One page of point features, as returned by a locations query.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A single point feature on the wire. Display attributes are strings or
/// null; anything else is rejected during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: BTreeMap<String, Option<String>>,
}

impl Feature {
    /// The raw severity string, when the feature carries one.
    pub fn severity(&self) -> Option<&str> {
        self.properties.get(SEVERITY_KEY).and_then(|v| v.as_deref())
    }
}

/// Point geometry; coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub coordinates: [f64; 2],
}

/// Geocoder response: candidate places for a search string.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderResponse {
    #[serde(default)]
    pub features: Vec<Place>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub geometry: Geometry,
    pub properties: PlaceProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceProperties {
    pub name: String,
    #[serde(default)]
    pub near: Option<String>,
}

/// Structured error body the endpoint sends on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
