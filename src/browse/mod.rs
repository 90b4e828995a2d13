pub mod controller;
pub mod stats;

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::catalog::slugify;
use crate::catalog::types::{Dataset, Platform, Project};
use crate::render::{Node, ViewMode};
use stats::Slice;

/// Selected value meaning "do not constrain this dimension".
pub const ALL: &str = "all";

/// A filterable dimension besides free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Category,
    Status,
    Country,
    Provider,
    Region,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Category,
        Facet::Status,
        Facet::Country,
        Facet::Provider,
        Facet::Region,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::Status => "status",
            Facet::Country => "country",
            Facet::Provider => "provider",
            Facet::Region => "region",
        }
    }

    pub fn parse(name: &str) -> Option<Facet> {
        match name {
            "category" => Some(Facet::Category),
            "status" => Some(Facet::Status),
            "country" => Some(Facet::Country),
            "provider" => Some(Facet::Provider),
            "region" => Some(Facet::Region),
            _ => None,
        }
    }

    /// Free-text facets are compared by slug, since their option values
    /// are slugs of whatever the source spelled.
    fn free_text(&self) -> bool {
        matches!(self, Facet::Country | Facet::Provider)
    }

    fn accepts(&self, value: &str, selected: &str) -> bool {
        if self.free_text() {
            slugify(value) == slugify(selected)
        } else {
            value == selected
        }
    }

    /// Option value for a record's facet value.
    pub fn option_value(&self, value: &str) -> String {
        if self.free_text() {
            slugify(value)
        } else {
            value.to_string()
        }
    }
}

/// What the filter engine needs to know about a record.
pub trait Filterable {
    /// Fields the free-text search looks in.
    fn search_fields(&self) -> Vec<&str>;

    /// Derived value of `facet`, `None` when the record has no such field.
    fn facet(&self, facet: Facet) -> Option<&str>;

    /// Human label for the record's value of `facet`.
    fn facet_label(&self, facet: Facet) -> Option<String> {
        self.facet(facet).map(str::to_string)
    }
}

/// A record type with a browsable page.
pub trait Listing: Filterable + Clone + 'static {
    const NOUN: &'static str;
    const PLURAL: &'static str;
    /// Element id whose presence marks the page.
    const ANCHOR: &'static str;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn card(&self, view: ViewMode) -> Node;
    fn detail(&self) -> Node;
    fn stat_slices() -> &'static [Slice<Self>];
}

fn unconstrained(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Current filter selection of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    /// Lower-cased, trimmed query.
    search: String,
    selected: BTreeMap<Facet, String>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(filter name, value)` pairs; `search` is the free-text
    /// query, the rest are facet names. Unknown names are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut filters = Self::new();
        for (name, value) in pairs {
            filters.set(name, value);
        }
        filters
    }

    pub fn set(&mut self, name: &str, value: &str) {
        if name == "search" {
            self.set_search(value);
        } else if let Some(facet) = Facet::parse(name) {
            self.select(facet, value);
        } else {
            debug!(name, "ignoring unknown filter");
        }
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
    }

    /// Select `value` for `facet`; `all` or empty clears the facet.
    pub fn select(&mut self, facet: Facet, value: &str) {
        if unconstrained(value) {
            self.selected.remove(&facet);
        } else {
            self.selected.insert(facet, value.trim().to_string());
        }
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.selected.clear();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selected(&self, facet: Facet) -> Option<&str> {
        self.selected.get(&facet).map(String::as_str)
    }

    /// `name=value` for every constrained dimension, search first.
    pub fn describe(&self) -> Vec<String> {
        let search = (!self.search.is_empty()).then(|| format!("search=\"{}\"", self.search));
        search
            .into_iter()
            .chain(
                Facet::ALL
                    .iter()
                    .filter_map(|f| Some(format!("{}={}", f.name(), self.selected(*f)?))),
            )
            .collect()
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.selected.is_empty()
    }

    /// True iff `record` satisfies every active predicate.
    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        if !self.search.is_empty()
            && !record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.search))
        {
            return false;
        }
        self.selected.iter().all(|(facet, selected)| {
            record
                .facet(*facet)
                .is_some_and(|value| facet.accepts(value, selected))
        })
    }
}

/// Records passing every active filter, in input order.
pub fn apply_filters<T: Filterable + Clone>(records: &[T], active: &ActiveFilters) -> Vec<T> {
    records
        .iter()
        .filter(|r| active.matches(*r))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

/// Distinct options for a facet dropdown, sorted by label.
pub fn facet_options<T: Filterable>(records: &[T], facet: Facet) -> Vec<FacetOption> {
    let mut seen = BTreeSet::new();
    let mut options: Vec<FacetOption> = records
        .iter()
        .filter_map(|r| {
            let value = facet.option_value(r.facet(facet)?);
            let label = r.facet_label(facet)?;
            (!value.is_empty() && seen.insert(value.clone())).then_some(FacetOption { value, label })
        })
        .collect();
    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
    options
}

impl Filterable for Project {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.organization.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Status => Some(self.status.as_str()),
            Facet::Country => Some(self.country.as_str()),
            Facet::Provider | Facet::Region => None,
        }
    }

    fn facet_label(&self, facet: Facet) -> Option<String> {
        match facet {
            Facet::Category => Some(self.category.label().to_string()),
            Facet::Status => Some(self.status.label().to_string()),
            _ => self.facet(facet).map(str::to_string),
        }
    }
}

impl Filterable for Platform {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.provider.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Provider => Some(self.provider.as_str()),
            Facet::Region => Some(self.region.as_str()),
            Facet::Status | Facet::Country => None,
        }
    }

    fn facet_label(&self, facet: Facet) -> Option<String> {
        match facet {
            Facet::Category => Some(self.category.label().to_string()),
            Facet::Region => Some(self.region.label().to_string()),
            _ => self.facet(facet).map(str::to_string),
        }
    }
}

impl Filterable for Dataset {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.country.as_str(), self.region.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Country => Some(self.country.as_str()),
            Facet::Region => Some(self.region.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback::fallback_records;
    use crate::catalog::normalize::{normalize_platform, normalize_project};
    use crate::catalog::types::Domain;
    use serde_json::json;

    fn projects() -> Vec<Project> {
        [
            json!({"Initiative/Item Name": "Kenya Rift Monitoring", "Thematic Area (Geoscientific)": "Seismic", "Status": "Active", "Lead Organization(s)": "University of Nairobi, Kenya"}),
            json!({"Initiative/Item Name": "Copperbelt Survey", "Thematic Area (Geoscientific)": "Copper mining", "Status": "Completed", "Lead Organization(s)": "Zambia Geological Survey"}),
            json!({"Initiative/Item Name": "Aquifer Atlas", "Thematic Area (Geoscientific)": "Groundwater", "Status": "Planned", "Abstract": "Maps aquifers in KENYA and Uganda", "Lead Organization(s)": "UNESCO"}),
            json!({"Initiative/Item Name": "Geo Data Hub", "Thematic Area (Geoscientific)": "Information systems", "Status": "Active", "Lead Organization(s)": "African Union"}),
        ]
        .iter()
        .map(normalize_project)
        .collect()
    }

    fn titles(records: &[Project]) -> Vec<&str> {
        records.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let all = projects();
        let out = apply_filters(&all, &ActiveFilters::new());
        assert_eq!(out, all);

        let out = apply_filters(
            &all,
            &ActiveFilters::from_pairs([("search", ""), ("category", "all"), ("status", ALL)]),
        );
        assert_eq!(out, all);
    }

    #[test]
    fn test_single_category_match() {
        let out = apply_filters(
            &projects(),
            &ActiveFilters::from_pairs([("category", "mining"), ("status", "all")]),
        );
        assert_eq!(titles(&out), vec!["Copperbelt Survey"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let all = projects();
        let lower = apply_filters(&all, &ActiveFilters::from_pairs([("search", "kenya")]));
        let upper = apply_filters(&all, &ActiveFilters::from_pairs([("search", "KENYA")]));
        assert_eq!(lower, upper);
        assert_eq!(titles(&lower), vec!["Kenya Rift Monitoring", "Aquifer Atlas"]);
    }

    #[test]
    fn test_search_covers_organization() {
        let out = apply_filters(&projects(), &ActiveFilters::from_pairs([("search", "unesco")]));
        assert_eq!(titles(&out), vec!["Aquifer Atlas"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let all = projects();
        let both = ActiveFilters::from_pairs([("search", "kenya"), ("status", "upcoming")]);
        let out = apply_filters(&all, &both);
        assert_eq!(titles(&out), vec!["Aquifer Atlas"]);

        // Result equals the intersection of the single-predicate results.
        let by_search = apply_filters(&all, &ActiveFilters::from_pairs([("search", "kenya")]));
        let by_status = apply_filters(&all, &ActiveFilters::from_pairs([("status", "upcoming")]));
        let intersection: Vec<Project> = by_search
            .into_iter()
            .filter(|p| by_status.contains(p))
            .collect();
        assert_eq!(out, intersection);
    }

    #[test]
    fn test_apply_filters_is_idempotent() {
        let active = ActiveFilters::from_pairs([("status", "ongoing"), ("search", "a")]);
        let once = apply_filters(&projects(), &active);
        let twice = apply_filters(&once, &active);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_facet_excludes_record() {
        let out = apply_filters(
            &projects(),
            &ActiveFilters::from_pairs([("provider", "esri")]),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_country_facet_compares_slugs() {
        let all = projects();
        let by_slug = apply_filters(&all, &ActiveFilters::from_pairs([("country", "multi-country")]));
        let by_label = apply_filters(&all, &ActiveFilters::from_pairs([("country", "Multi-country")]));
        assert_eq!(titles(&by_slug), vec!["Geo Data Hub"]);
        assert_eq!(by_slug, by_label);
    }

    #[test]
    fn test_clearing_a_facet() {
        let mut active = ActiveFilters::from_pairs([("category", "seismic")]);
        assert!(active.is_active());
        active.select(Facet::Category, "all");
        assert!(!active.is_active());
        assert_eq!(active.selected(Facet::Category), None);
    }

    #[test]
    fn test_describe_lists_constraints() {
        let active =
            ActiveFilters::from_pairs([("region", "East Africa"), ("search", " Rift "), ("status", "all")]);
        assert_eq!(active.describe(), vec!["search=\"rift\"", "region=East Africa"]);
        assert!(ActiveFilters::new().describe().is_empty());
    }

    #[test]
    fn test_unknown_filter_names_are_ignored() {
        let active = ActiveFilters::from_pairs([("colour", "red")]);
        assert!(!active.is_active());
    }

    #[test]
    fn test_facet_options_are_distinct_and_sorted() {
        let platforms: Vec<Platform> = fallback_records(Domain::Platforms)
            .iter()
            .map(normalize_platform)
            .collect();
        let providers = facet_options(&platforms, Facet::Provider);
        assert_eq!(
            providers,
            vec![
                FacetOption { value: "digital-earth-africa".into(), label: "Digital Earth Africa".into() },
                FacetOption { value: "esri".into(), label: "Esri".into() },
            ]
        );

        let countries = facet_options(&projects(), Facet::Country);
        let labels: Vec<&str> = countries.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["International", "Kenya", "Multi-country", "Zambia"]);
    }

    #[test]
    fn test_platform_provider_filter() {
        let platforms: Vec<Platform> = fallback_records(Domain::Platforms)
            .iter()
            .map(normalize_platform)
            .collect();
        let out = apply_filters(
            &platforms,
            &ActiveFilters::from_pairs([("provider", "esri"), ("region", "continental")]),
        );
        let names: Vec<&str> = out.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Africa GeoPortal"]);
    }
}
