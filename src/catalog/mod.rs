pub mod fallback;
pub mod inventory;
pub mod loader;
pub mod normalize;
pub mod types;

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{info, warn};

use loader::DataLoader;
use types::{Dataset, Domain, Platform, Project, RawRecord, Record};

/// Country boundaries for the inventory choropleth.
pub const BOUNDARIES_PATH: &str = "data/africa_regions.geojson";

/// Stable identifier derived from a display name: lower-cased, runs of
/// anything outside `[a-z0-9]` collapsed to one `-`, ends trimmed.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Every normalized record of one load. Immutable once built; a reload
/// builds a new catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub projects: Vec<Project>,
    pub platforms: Vec<Platform>,
    pub datasets: Vec<Dataset>,
    pub loaded_at: i64,
}

impl Catalog {
    /// Fetch all three sources together. Each load resolves on its own
    /// (fallbacks included), so one slow or broken source never holds
    /// back the others.
    pub async fn load(loader: &DataLoader) -> Self {
        let loads = Domain::ALL.iter().map(|domain| async move {
            let records = loader.load(*domain).await;
            (*domain, records)
        });
        let raw: HashMap<Domain, Vec<RawRecord>> = join_all(loads).await.into_iter().collect();
        let catalog = Self::from_raw(&raw);
        info!(
            projects = catalog.projects.len(),
            platforms = catalog.platforms.len(),
            datasets = catalog.datasets.len(),
            "Catalog loaded"
        );
        catalog
    }

    pub fn from_raw(raw: &HashMap<Domain, Vec<RawRecord>>) -> Self {
        let mut catalog = Self {
            loaded_at: chrono::Utc::now().timestamp(),
            ..Default::default()
        };
        for domain in Domain::ALL {
            for record in raw.get(&domain).into_iter().flatten() {
                match normalize::normalize(record, domain) {
                    Record::Project(p) => catalog.projects.push(p),
                    Record::Platform(p) => catalog.platforms.push(p),
                    Record::Dataset(d) => catalog.datasets.push(d),
                }
            }
        }
        report_collisions(Domain::Projects, catalog.projects.iter().map(|p| p.id.as_str()));
        report_collisions(Domain::Platforms, catalog.platforms.iter().map(|p| p.id.as_str()));
        report_collisions(Domain::Datasets, catalog.datasets.iter().map(|d| d.id.as_str()));
        catalog
    }

    /// First project with this id. Colliding ids resolve to the earliest record.
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn platform(&self, id: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn dataset(&self, country: &str) -> Option<&Dataset> {
        self.datasets
            .iter()
            .find(|d| d.country == country || d.id == country)
    }
}

fn report_collisions<'a>(domain: Domain, ids: impl Iterator<Item = &'a str>) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for id in ids {
        *seen.entry(id).or_default() += 1;
    }
    for (id, count) in seen.into_iter().filter(|(_, n)| *n > 1) {
        warn!(?domain, id, count, "Records share an id; lookups return the first");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Africa Array"), "africa-array");
        assert_eq!(slugify("  --Digital Earth: Africa!! "), "digital-earth-africa");
        assert_eq!(slugify("Côte d'Ivoire"), "c-te-d-ivoire");
        assert_eq!(slugify("SADC  Mining_Sector 2024"), "sadc-mining-sector-2024");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_from_raw_normalizes_every_domain() {
        let mut raw = HashMap::new();
        raw.insert(
            Domain::Projects,
            vec![json!({"Initiative/Item Name": "Rift Study"}), json!({})],
        );
        raw.insert(Domain::Datasets, vec![json!({"Country": "Mali"})]);
        let catalog = Catalog::from_raw(&raw);
        assert_eq!(catalog.projects.len(), 2);
        assert!(catalog.platforms.is_empty());
        assert_eq!(catalog.project("rift-study").unwrap().title, "Rift Study");
        assert_eq!(catalog.dataset("Mali").unwrap().region, "West Africa");
        assert_eq!(catalog.dataset("mali").unwrap().country, "Mali");
    }

    #[test]
    fn test_colliding_ids_resolve_to_first() {
        let mut raw = HashMap::new();
        raw.insert(
            Domain::Projects,
            vec![
                json!({"Initiative/Item Name": "Rift Study", "Abstract": "first"}),
                json!({"Initiative/Item Name": "rift  study!", "Abstract": "second"}),
            ],
        );
        let catalog = Catalog::from_raw(&raw);
        assert_eq!(catalog.project("rift-study").unwrap().description, "first");
    }

    #[tokio::test]
    async fn test_load_survives_unreachable_source() {
        let source = loader::DataSource::parse("http://127.0.0.1:9").unwrap();
        let catalog = Catalog::load(&DataLoader::new(source)).await;
        assert!(catalog.projects.iter().any(|p| p.title == "Africa Array"));
        assert!(!catalog.platforms.is_empty());
        assert!(!catalog.datasets.is_empty());
    }
}
