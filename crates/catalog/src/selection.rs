use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Catalog, SceneFeed};

/// Ids of the sources currently switched on.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedSources {
    ids: BTreeSet<String>,
}

impl SelectedSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Scene feeds driven by at least one selected source.
    pub fn active_feeds(&self, catalog: &Catalog) -> ActiveFeeds {
        let mut feeds = ActiveFeeds::default();
        for source in catalog.sources().filter(|s| self.contains(&s.id)) {
            match source.feed {
                SceneFeed::Elevation => feeds.elevation = true,
                SceneFeed::Weather => feeds.weather = true,
                SceneFeed::None => {}
            }
        }
        feeds
    }
}

impl<S: Into<String>> FromIterator<S> for SelectedSources {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActiveFeeds {
    pub elevation: bool,
    pub weather: bool,
}

impl ActiveFeeds {
    pub const ALL: ActiveFeeds = ActiveFeeds {
        elevation: true,
        weather: true,
    };
}

#[cfg(test)]
mod tests {
    use super::{ActiveFeeds, SelectedSources};
    use crate::default_catalog;

    #[test]
    fn double_toggle_restores_membership() {
        let original: SelectedSources = ["environment-canada", "nrcan-elevation"]
            .into_iter()
            .collect();
        for id in ["nrcan-elevation", "stats-canada", "unknown"] {
            let mut s = original.clone();
            s.toggle(id);
            assert_ne!(s, original);
            s.toggle(id);
            assert_eq!(s, original);
        }
    }

    #[test]
    fn feeds_follow_selection() {
        let catalog = default_catalog();
        let mut s = catalog.default_selection();
        assert_eq!(s.active_feeds(&catalog), ActiveFeeds::ALL);

        s.toggle("environment-canada");
        assert_eq!(
            s.active_feeds(&catalog),
            ActiveFeeds {
                elevation: true,
                weather: false
            }
        );

        // Either weather source drives the weather feed.
        s.toggle("openweathermap");
        assert!(s.active_feeds(&catalog).weather);

        let none = SelectedSources::new();
        assert_eq!(none.active_feeds(&catalog), ActiveFeeds::default());
    }
}
