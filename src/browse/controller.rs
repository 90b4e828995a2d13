//! One browsable page: its records, the active filters and the view mode.

use std::collections::BTreeMap;

use tracing::debug;

use super::stats::{aggregate, result_count};
use super::{apply_filters, ActiveFilters, Facet, Listing};
use crate::render::{empty_state, staggered, Container, Document, Node, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Items(usize),
    Empty,
}

/// Page controller. Every filter event re-runs the full filter over the
/// records it was created with; view changes only affect rendering.
#[derive(Debug, Clone)]
pub struct Browser<T: Listing> {
    records: Vec<T>,
    filtered: Vec<T>,
    filters: ActiveFilters,
    view: ViewMode,
}

impl<T: Listing> Browser<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            filtered: records.clone(),
            records,
            filters: ActiveFilters::new(),
            view: ViewMode::default(),
        }
    }

    /// Controller for `doc`, or `None` when the page lacks this listing's
    /// anchor element.
    pub fn mount(doc: &Document, records: Vec<T>) -> Option<Self> {
        if !doc.has(T::ANCHOR) {
            debug!(anchor = T::ANCHOR, "Anchor not on page, skipping");
            return None;
        }
        Some(Self::new(records))
    }

    pub fn with_filters(mut self, filters: ActiveFilters) -> Self {
        self.filters = filters;
        self.refilter();
        self
    }

    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    fn refilter(&mut self) {
        self.filtered = apply_filters(&self.records, &self.filters);
        debug!(
            listing = T::PLURAL,
            total = self.records.len(),
            shown = self.filtered.len(),
            "Filters applied"
        );
    }

    pub fn set_search(&mut self, query: &str) {
        self.filters.set_search(query);
        self.refilter();
    }

    pub fn select(&mut self, facet: Facet, value: &str) {
        self.filters.select(facet, value);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    /// Rendered items for the current filter result, or the empty state.
    pub fn items(&self) -> Vec<Node> {
        if self.filtered.is_empty() {
            return vec![empty_state(T::PLURAL)];
        }
        self.filtered
            .iter()
            .enumerate()
            .map(|(i, r)| staggered(r.card(self.view), i))
            .collect()
    }

    /// Replace the content of `container`.
    pub fn render_into(&self, container: &mut Container) -> Rendered {
        container.class = format!("{}-view", self.view.as_str());
        container.replace(self.items());
        if self.filtered.is_empty() {
            Rendered::Empty
        } else {
            Rendered::Items(self.filtered.len())
        }
    }

    /// Render into this listing's anchor; `None` when `doc` lacks it.
    pub fn render(&self, doc: &mut Document) -> Option<Rendered> {
        let container = doc.get_mut(T::ANCHOR)?;
        Some(self.render_into(container))
    }

    pub fn result_count(&self) -> String {
        result_count(self.filtered.len(), T::NOUN, T::PLURAL)
    }

    /// Counters over every loaded record.
    pub fn stats(&self) -> BTreeMap<&'static str, usize> {
        aggregate(&self.records, T::stat_slices())
    }

    /// Counters over the current filter result.
    pub fn filtered_stats(&self) -> BTreeMap<&'static str, usize> {
        aggregate(&self.filtered, T::stat_slices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::stats::TOTAL;
    use crate::catalog::fallback::fallback_records;
    use crate::catalog::normalize::{normalize_platform, normalize_project};
    use crate::catalog::types::{Domain, Platform, Project};

    fn projects() -> Vec<Project> {
        fallback_records(Domain::Projects)
            .iter()
            .map(normalize_project)
            .collect()
    }

    fn platforms() -> Vec<Platform> {
        fallback_records(Domain::Platforms)
            .iter()
            .map(normalize_platform)
            .collect()
    }

    #[test]
    fn test_mount_requires_anchor() {
        let doc = Document::new().with_anchor("platforms-grid");
        assert!(Browser::<Project>::mount(&doc, projects()).is_none());
        assert!(Browser::<Platform>::mount(&doc, platforms()).is_some());
    }

    #[test]
    fn test_render_fills_anchor_with_staggered_cards() {
        let mut doc = Document::new().with_anchor("project-grid");
        let browser = Browser::mount(&doc, projects()).unwrap();
        assert_eq!(browser.render(&mut doc), Some(Rendered::Items(5)));

        let grid = doc.get("project-grid").unwrap();
        assert_eq!(grid.children.len(), 5);
        let html = grid.to_html();
        assert!(html.starts_with("<div id=\"project-grid\" class=\"grid-view\">"));
        assert!(html.contains("style=\"animation-delay: 0ms\""));
        assert!(html.contains("style=\"animation-delay: 400ms\""));
        assert!(!html.contains("animation-delay: 500ms"));
    }

    #[test]
    fn test_empty_result_renders_empty_state() {
        let mut browser = Browser::new(projects());
        browser.set_search("no such thing anywhere");
        let mut container = Container::new("project-grid");
        assert_eq!(browser.render_into(&mut container), Rendered::Empty);
        assert_eq!(container.children.len(), 1);
        assert!(container.to_html().contains("No Projects Found"));
        assert_eq!(browser.result_count(), "0 projects found");

        browser.clear_filters();
        assert_eq!(browser.render_into(&mut container), Rendered::Items(5));
    }

    #[test]
    fn test_mining_scenario() {
        let mut browser = Browser::new(projects());
        browser.select(Facet::Category, "mining");
        browser.select(Facet::Status, "all");
        assert_eq!(browser.filtered().len(), 1);
        assert_eq!(browser.result_count(), "1 project found");
        assert_eq!(browser.filtered()[0].title, "Southern Africa Mining Impact Study");
    }

    #[test]
    fn test_view_switch_keeps_filter_result() {
        let mut browser = Browser::new(platforms());
        browser.select(Facet::Provider, "esri");
        let before = browser.filtered().to_vec();

        browser.set_view(ViewMode::List);
        assert_eq!(browser.filtered(), &before[..]);

        let mut container = Container::new("platforms-grid");
        browser.render_into(&mut container);
        assert_eq!(container.class, "list-view");
        assert!(container.to_html().contains("platform-list-item"));
    }

    #[test]
    fn test_stats_cover_all_records() {
        let mut browser = Browser::new(projects());
        browser.select(Facet::Status, "completed");
        assert_eq!(browser.stats()[TOTAL], 5);
        assert_eq!(browser.filtered_stats()[TOTAL], 1);
        assert_eq!(browser.filtered_stats()["completed"], 1);
    }
}
