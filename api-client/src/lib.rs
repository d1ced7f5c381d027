use std::collections::BTreeMap;
use std::time::Duration;

pub mod error;
pub mod types;

pub use error::QueryError;
pub use types::{Feature, FeatureCollection, GeocoderResponse, Geometry, Place, SEVERITY_KEY};

/// Canonical form-parameter mapping: one value per logical name, keys
/// present only when a control produced a non-empty value.
pub type ParameterSet = BTreeMap<String, String>;

const COLLISIONS_PATH: &str = "/v2/collisions.locations";
const GEOCODER_PATH: &str = "/v2/geocoder";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking client for the collision locations API.
///
/// One call issues one request; there is no retry, caching, or cancellation
/// here. Overlapping-request ordering is the caller's concern.
pub struct CollisionsApi {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl CollisionsApi {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, QueryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches the collision features inside `bbox` matching `params`.
    ///
    /// `bbox` is the `west,south,east,north` string; `params` is the encoded
    /// form state. The two never collide with `bbox`/`key` by construction
    /// of the form.
    pub fn collisions(
        &self,
        bbox: &str,
        params: &ParameterSet,
    ) -> Result<FeatureCollection, QueryError> {
        let url = format!("{}{}", self.base_url, COLLISIONS_PATH);
        let query = build_query(bbox, &self.api_key, params);
        let body = self.get(&url, &query)?;

        serde_json::from_str(&body).map_err(|e| QueryError::Malformed(e.to_string()))
    }

    /// Looks up candidate places for a search string, bounded to the
    /// configured area.
    pub fn geocode(&self, text: &str, bounds: &str) -> Result<GeocoderResponse, QueryError> {
        let url = format!("{}{}", self.base_url, GEOCODER_PATH);
        let query = vec![
            ("key".to_string(), self.api_key.clone()),
            ("bounded".to_string(), "1".to_string()),
            ("bbox".to_string(), bounds.to_string()),
            ("q".to_string(), text.to_string()),
        ];
        let body = self.get(&url, &query)?;

        serde_json::from_str(&body).map_err(|e| QueryError::Malformed(e.to_string()))
    }

    fn get(&self, url: &str, query: &[(String, String)]) -> Result<String, QueryError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Flattens extent, access key and form parameters into one outgoing query.
pub fn build_query(bbox: &str, key: &str, params: &ParameterSet) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(params.len() + 2);
    query.push(("bbox".to_string(), bbox.to_string()));
    query.push(("key".to_string(), key.to_string()));
    for (name, value) in params {
        query.push((name.clone(), value.clone()));
    }
    query
}

/// Prefers the server-supplied message when the error body is structured.
fn error_from_body(status: u16, body: &str) -> QueryError {
    match serde_json::from_str::<types::ErrorBody>(body) {
        Ok(parsed) => QueryError::Api(parsed.error),
        Err(_) => QueryError::Transport(format!("endpoint returned status {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_flattens_extent_key_and_parameters() {
        let mut params = ParameterSet::new();
        params.insert("casualties".to_string(), "cyclist".to_string());
        params.insert("date_from".to_string(), "2020-01-01".to_string());

        let query = build_query("-0.5,51.3,0.3,51.7", "abc123", &params);

        assert_eq!(
            query,
            vec![
                ("bbox".to_string(), "-0.5,51.3,0.3,51.7".to_string()),
                ("key".to_string(), "abc123".to_string()),
                ("casualties".to_string(), "cyclist".to_string()),
                ("date_from".to_string(), "2020-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_query_with_empty_parameters() {
        let query = build_query("0,0,1,1", "k", &ParameterSet::new());
        assert_eq!(query.len(), 2);
        assert_eq!(query[0].0, "bbox");
        assert_eq!(query[1].0, "key");
    }

    #[test]
    fn test_error_from_structured_body() {
        let error = error_from_body(400, r#"{"error": "Bad bbox"}"#);
        assert_eq!(error, QueryError::Api("Bad bbox".to_string()));
    }

    #[test]
    fn test_error_from_unstructured_body() {
        let error = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(
            error,
            QueryError::Transport("endpoint returned status 502".to_string())
        );
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let api = CollisionsApi::new("https://api.example.com/", "k").unwrap();
        assert_eq!(api.base_url, "https://api.example.com");
    }
}
