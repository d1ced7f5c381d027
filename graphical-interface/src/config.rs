use std::env;

/// Startup configuration, constructed once in `main` and passed into each
/// component; immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Tile URL template with `{z}`/`{x}`/`{y}` placeholders.
    pub tile_url: String,
    pub api_base_url: String,
    pub api_key: String,
    /// `west,south,east,north` bounds applied to geocoder lookups.
    pub autocomplete_bbox: String,
    /// (latitude, longitude) of the startup view.
    pub initial_position: (f64, f64),
    pub initial_zoom: f64,
    /// Joins grouped checkbox values; must match the delimiter the API
    /// expects for multi-valued parameters.
    pub group_delimiter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            api_base_url: "https://api.cyclestreets.net".to_string(),
            api_key: String::new(),
            autocomplete_bbox: "-6.6577,49.9370,1.7797,57.6924".to_string(),
            initial_position: (51.505, -0.09),
            initial_zoom: 13.0,
            group_delimiter: ",".to_string(),
        }
    }
}

impl Settings {
    /// Defaults with environment overrides, read once at startup.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = env::var("COLLISION_MAP_API_URL") {
            settings.api_base_url = url;
        }
        if let Ok(key) = env::var("COLLISION_MAP_API_KEY") {
            settings.api_key = key;
        }
        if let Ok(url) = env::var("COLLISION_MAP_TILE_URL") {
            settings.tile_url = url;
        }
        settings
    }
}
