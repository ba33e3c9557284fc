//! Static catalog of the external data sources a user can switch on, and
//! the sidebar state that selects among them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod controller;
pub mod selection;

pub use controller::*;
pub use selection::*;

/// Scene layer a source drives when selected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneFeed {
    Elevation,
    Weather,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub enabled_by_default: bool,
    #[serde(default)]
    pub feed: SceneFeed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub expanded_by_default: bool,
    pub sources: Vec<DataSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<DataCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A source or category id appears more than once.
    DuplicateId(String),
    Parse(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateId(id) => write!(f, "duplicate catalog id {id:?}"),
            CatalogError::Parse(msg) => write!(f, "catalog file is not valid: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog read error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CatalogError::Io(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut categories = BTreeSet::new();
        let mut sources = BTreeSet::new();
        for category in &self.categories {
            if !categories.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateId(category.id.clone()));
            }
            for source in &category.sources {
                if !sources.insert(source.id.as_str()) {
                    return Err(CatalogError::DuplicateId(source.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn category(&self, id: &str) -> Option<&DataCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn sources(&self) -> impl Iterator<Item = &DataSource> {
        self.categories.iter().flat_map(|c| c.sources.iter())
    }

    pub fn source(&self, id: &str) -> Option<&DataSource> {
        self.sources().find(|s| s.id == id)
    }

    pub fn default_selection(&self) -> SelectedSources {
        self.sources()
            .filter(|s| s.enabled_by_default)
            .map(|s| s.id.clone())
            .collect()
    }
}

fn source(id: &str, label: &str, description: &str, enabled: bool, feed: SceneFeed) -> DataSource {
    DataSource {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        enabled_by_default: enabled,
        feed,
    }
}

fn category(id: &str, title: &str, expanded: bool, sources: Vec<DataSource>) -> DataCategory {
    DataCategory {
        id: id.to_string(),
        title: title.to_string(),
        expanded_by_default: expanded,
        sources,
    }
}

/// The built-in Newfoundland catalog.
pub fn default_catalog() -> Catalog {
    Catalog {
        categories: vec![
            category(
                "weather",
                "🌤️ Weather & Climate",
                true,
                vec![
                    source(
                        "environment-canada",
                        "Environment Canada",
                        "Real-time weather, forecasts, alerts",
                        true,
                        SceneFeed::Weather,
                    ),
                    source(
                        "openweathermap",
                        "OpenWeatherMap",
                        "Current weather, forecasts (free tier)",
                        false,
                        SceneFeed::Weather,
                    ),
                ],
            ),
            category(
                "geographic",
                "🌍 Geographic Data",
                true,
                vec![
                    source(
                        "nrcan-elevation",
                        "NRCan Elevation",
                        "Elevation, topography, geology",
                        true,
                        SceneFeed::Elevation,
                    ),
                    source(
                        "nasa-earthdata",
                        "NASA EarthData",
                        "Satellite imagery, land cover",
                        false,
                        SceneFeed::None,
                    ),
                ],
            ),
            category(
                "marine",
                "🌊 Marine & Coastal",
                false,
                vec![source(
                    "fisheries-oceans",
                    "Fisheries & Oceans Canada",
                    "Ocean conditions, tides",
                    false,
                    SceneFeed::None,
                )],
            ),
            category(
                "demographics",
                "🏘️ Demographics",
                false,
                vec![source(
                    "stats-canada",
                    "Statistics Canada",
                    "Population, census data",
                    false,
                    SceneFeed::None,
                )],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, SceneFeed, default_catalog};
    use pretty_assertions::assert_eq;

    #[test]
    fn default_catalog_shape() {
        let catalog = default_catalog();
        let ids: Vec<&str> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["weather", "geographic", "marine", "demographics"]);
        assert_eq!(catalog.sources().count(), 6);
        assert_eq!(
            catalog.default_selection().iter().collect::<Vec<_>>(),
            vec!["environment-canada", "nrcan-elevation"]
        );
        assert_eq!(catalog.source("nrcan-elevation").unwrap().feed, SceneFeed::Elevation);
        assert!(!catalog.category("marine").unwrap().expanded_by_default);
    }

    #[test]
    fn json_round_trips_through_validation() {
        let raw = serde_json::to_string(&default_catalog()).unwrap();
        assert_eq!(Catalog::from_json(&raw).unwrap(), default_catalog());
    }

    #[test]
    fn optional_fields_default() {
        let catalog = Catalog::from_json(
            r#"{"categories": [{"id": "c", "title": "C", "sources": [
                {"id": "s", "label": "S", "description": "d"}
            ]}]}"#,
        )
        .unwrap();
        let s = catalog.source("s").unwrap();
        assert!(!s.enabled_by_default);
        assert_eq!(s.feed, SceneFeed::None);
    }

    #[test]
    fn duplicate_source_ids_are_rejected() {
        let raw = r#"{"categories": [
            {"id": "a", "title": "A", "sources": [{"id": "x", "label": "X", "description": ""}]},
            {"id": "b", "title": "B", "sources": [{"id": "x", "label": "X2", "description": ""}]}
        ]}"#;
        assert_eq!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicateId("x".to_string()))
        );
        assert!(matches!(Catalog::from_json("{"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Catalog::from_path("/nonexistent/terrascope-catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
