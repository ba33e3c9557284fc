use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;

use foundation::point::GeoPoint;
use sources::elevation::DEFAULT_ELEVATION_URL;
use sources::lattice::DEFAULT_MAX_LOCATIONS;
use sources::weather::DEFAULT_WEATHER_URL;

pub const DEFAULT_RESOLUTION: u32 = 32;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting that must be positive was zero.
    Zero(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Zero(key) => write!(f, "{key} must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct ViewerConfig {
    pub api_key: Option<String>,
    pub elevation_url: String,
    pub weather_url: String,
    pub weather_limit: u32,
    pub resolution: NonZeroU32,
    pub max_locations: usize,
    pub debounce_ms: u64,
    pub center: GeoPoint,
    pub zoom: f64,
    pub catalog_path: Option<PathBuf>,
}

// Hand-written so the API key never reaches a log line.
impl std::fmt::Debug for ViewerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("elevation_url", &self.elevation_url)
            .field("weather_url", &self.weather_url)
            .field("weather_limit", &self.weather_limit)
            .field("resolution", &self.resolution)
            .field("max_locations", &self.max_locations)
            .field("debounce_ms", &self.debounce_ms)
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparsable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        let resolution = lookup("ELEVATION_RESOLUTION")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_RESOLUTION);
        let max_locations = lookup("ELEVATION_MAX_LOCATIONS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_LOCATIONS);
        if max_locations == 0 {
            return Err(ConfigError::Zero("ELEVATION_MAX_LOCATIONS"));
        }

        Ok(Self {
            api_key: lookup("ARCGIS_ELEVATION_API_KEY").filter(|k| !k.is_empty()),
            elevation_url: lookup("ELEVATION_URL")
                .unwrap_or_else(|| DEFAULT_ELEVATION_URL.to_string()),
            weather_url: lookup("WEATHER_URL").unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            weather_limit: lookup("WEATHER_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1),
            resolution: NonZeroU32::new(resolution)
                .ok_or(ConfigError::Zero("ELEVATION_RESOLUTION"))?,
            max_locations,
            debounce_ms: lookup("ELEVATION_DEBOUNCE_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
            center: GeoPoint::new(
                parsed("MAP_CENTER_LON").unwrap_or(-56.5),
                parsed("MAP_CENTER_LAT").unwrap_or(47.5),
            ),
            zoom: parsed("MAP_ZOOM").unwrap_or(7.0),
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewerConfig};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn config(vars: &[(&str, &str)]) -> Result<ViewerConfig, ConfigError> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ViewerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let c = config(&[]).unwrap();
        assert_eq!(c.api_key, None);
        assert_eq!(c.resolution.get(), 32);
        assert_eq!(c.max_locations, 100);
        assert_eq!(c.debounce_ms, 1500);
        assert_eq!(c.weather_limit, 1);
        assert_eq!((c.center.longitude, c.center.latitude, c.zoom), (-56.5, 47.5, 7.0));
        assert!(c.elevation_url.ends_with("/elevation/at-many-points"));
        assert!(c.catalog_path.is_none());
    }

    #[test]
    fn overrides_and_bad_values() {
        let c = config(&[
            ("ELEVATION_RESOLUTION", "9"),
            ("ELEVATION_DEBOUNCE_MS", "soon"),
            ("MAP_ZOOM", " 9.5 "),
        ])
        .unwrap();
        assert_eq!(c.resolution.get(), 9);
        assert_eq!(c.debounce_ms, 1500);
        assert_eq!(c.zoom, 9.5);

        assert_eq!(
            config(&[("ELEVATION_RESOLUTION", "0")]).unwrap_err(),
            ConfigError::Zero("ELEVATION_RESOLUTION")
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let c = config(&[("ARCGIS_ELEVATION_API_KEY", "AAPK-secret")]).unwrap();
        assert_eq!(c.api_key.as_deref(), Some("AAPK-secret"));
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("AAPK-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
