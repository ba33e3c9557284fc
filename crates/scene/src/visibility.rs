use catalog::ActiveFeeds;
use serde::Serialize;

/// Which optional layers the sidebar allows this frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LayerVisibility {
    pub terrain: bool,
    pub weather: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            terrain: true,
            weather: true,
        }
    }
}

impl From<ActiveFeeds> for LayerVisibility {
    fn from(feeds: ActiveFeeds) -> Self {
        Self {
            terrain: feeds.elevation,
            weather: feeds.weather,
        }
    }
}
