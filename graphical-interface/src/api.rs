use api_client::{CollisionsApi, ParameterSet, QueryError};
use logger::Logger;
use walkers::Position;

use crate::config::Settings;
use crate::types::{Feature, Severity};

/// Data-access seam between the refresh controller and the remote API.
/// Implemented by the real client here and by scripted fakes in tests.
pub trait Provider: Send + Sync {
    fn collisions(&self, bbox: &str, params: &ParameterSet) -> Result<Vec<Feature>, QueryError>;

    fn geocode(&self, text: &str) -> Result<Vec<Place>, QueryError>;
}

/// A geocoder hit ready for the search widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub position: Position,
}

/// The production `Provider`: one HTTP query per call against the
/// configured endpoint.
pub struct Api {
    client: CollisionsApi,
    autocomplete_bbox: String,
    logger: Logger,
}

impl Api {
    pub fn new(settings: &Settings, logger: Logger) -> Result<Self, QueryError> {
        Ok(Self {
            client: CollisionsApi::new(&settings.api_base_url, &settings.api_key)?,
            autocomplete_bbox: settings.autocomplete_bbox.clone(),
            logger,
        })
    }
}

impl Provider for Api {
    fn collisions(&self, bbox: &str, params: &ParameterSet) -> Result<Vec<Feature>, QueryError> {
        let collection = self.client.collisions(bbox, params)?;
        Ok(convert_features(collection, &self.logger))
    }

    fn geocode(&self, text: &str) -> Result<Vec<Place>, QueryError> {
        let response = self.client.geocode(text, &self.autocomplete_bbox)?;
        Ok(response
            .features
            .into_iter()
            .map(|place| {
                let [lon, lat] = place.geometry.coordinates;
                let name = match place.properties.near {
                    Some(near) => format!("{}, {}", place.properties.name, near),
                    None => place.properties.name,
                };
                Place {
                    name,
                    position: Position::from_lat_lon(lat, lon),
                }
            })
            .collect())
    }
}

/// Wire features to display features. A feature with a missing or unknown
/// severity is skipped with a warning; the rest of the collection renders.
fn convert_features(collection: api_client::FeatureCollection, logger: &Logger) -> Vec<Feature> {
    let mut features = Vec::with_capacity(collection.features.len());

    for wire in collection.features {
        let severity = match wire.severity().map(Severity::parse) {
            Some(Some(severity)) => severity,
            Some(None) => {
                let _ = logger.warn(
                    &format!(
                        "skipping feature with unknown severity '{}'",
                        wire.severity().unwrap_or_default()
                    ),
                    true,
                );
                continue;
            }
            None => {
                let _ = logger.warn("skipping feature without a severity", true);
                continue;
            }
        };

        let [lon, lat] = wire.geometry.coordinates;
        features.push(Feature {
            position: Position::from_lat_lon(lat, lon),
            severity,
            properties: wire.properties.into_iter().collect(),
        });
    }

    features
}
