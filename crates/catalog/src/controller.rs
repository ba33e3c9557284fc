//! Sidebar state: open/closed, per-category expansion and the selected set.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::selection::{ActiveFeeds, SelectedSources};
use crate::Catalog;

pub const SIDEBAR_WIDTH_PX: u32 = 320;
const TOGGLE_INSET_PX: u32 = 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarLayout {
    pub sidebar_width: u32,
    /// Left margin of the main content.
    pub content_margin: u32,
    pub toggle_x: u32,
    pub toggle_y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRow {
    pub id: String,
    pub label: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub id: String,
    pub title: String,
    pub expanded: bool,
    /// Empty while collapsed.
    pub sources: Vec<SourceRow>,
}

/// Sole writer of sidebar and selection state.
#[derive(Debug, Clone)]
pub struct SidebarController {
    catalog: Catalog,
    open: bool,
    expanded: BTreeMap<String, bool>,
    selected: SelectedSources,
}

impl SidebarController {
    pub fn new(catalog: Catalog) -> Self {
        let expanded = catalog
            .categories
            .iter()
            .map(|c| (c.id.clone(), c.expanded_by_default))
            .collect();
        let selected = catalog.default_selection();
        Self {
            catalog,
            open: true,
            expanded,
            selected,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_sidebar(&mut self) {
        self.open = !self.open;
    }

    pub fn is_expanded(&self, category_id: &str) -> Option<bool> {
        self.expanded.get(category_id).copied()
    }

    /// Returns the new expansion state, `None` for an unknown category.
    pub fn toggle_category(&mut self, category_id: &str) -> Option<bool> {
        let Some(flag) = self.expanded.get_mut(category_id) else {
            debug!("ignoring toggle of unknown category {category_id:?}");
            return None;
        };
        *flag = !*flag;
        Some(*flag)
    }

    /// Ids not in the catalog are toggled too; they simply drive no feed.
    pub fn toggle_source(&mut self, source_id: &str) -> bool {
        if self.catalog.source(source_id).is_none() {
            debug!("toggling source {source_id:?} that the catalog does not list");
        }
        self.selected.toggle(source_id)
    }

    pub fn selected(&self) -> &SelectedSources {
        &self.selected
    }

    pub fn active_feeds(&self) -> ActiveFeeds {
        self.selected.active_feeds(&self.catalog)
    }

    pub fn rows(&self) -> Vec<CategoryRow> {
        self.catalog
            .categories
            .iter()
            .map(|c| {
                let expanded = self.expanded.get(&c.id).copied().unwrap_or(false);
                let sources = if expanded {
                    c.sources
                        .iter()
                        .map(|s| SourceRow {
                            id: s.id.clone(),
                            label: s.label.clone(),
                            description: s.description.clone(),
                            active: self.selected.contains(&s.id),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                CategoryRow {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    expanded,
                    sources,
                }
            })
            .collect()
    }

    pub fn layout(&self) -> SidebarLayout {
        if self.open {
            SidebarLayout {
                sidebar_width: SIDEBAR_WIDTH_PX,
                content_margin: SIDEBAR_WIDTH_PX,
                toggle_x: SIDEBAR_WIDTH_PX + TOGGLE_INSET_PX,
                toggle_y: TOGGLE_INSET_PX,
            }
        } else {
            SidebarLayout {
                sidebar_width: SIDEBAR_WIDTH_PX,
                content_margin: 0,
                toggle_x: TOGGLE_INSET_PX,
                toggle_y: TOGGLE_INSET_PX,
            }
        }
    }
}
