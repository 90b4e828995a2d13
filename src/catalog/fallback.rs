use serde_json::json;

use super::types::{Domain, RawRecord};

/// Hand-authored records served when a source cannot be fetched or parsed.
/// Written in the upstream key layout so they go through the normalizer
/// like live data.
pub fn fallback_records(domain: Domain) -> Vec<RawRecord> {
    match domain {
        Domain::Datasets => datasets(),
        Domain::Projects => projects(),
        Domain::Platforms => platforms(),
    }
}

fn datasets() -> Vec<RawRecord> {
    vec![
        json!({
            "Country": "South Africa",
            "Map Scales (25-50 K)": "Yes",
            "Geophysics (Magnetic)": "Yes",
            "Geochemistry (Soil)": "Limited",
            "Mineral Resources": "Yes"
        }),
        json!({
            "Country": "Nigeria",
            "Map Scales (25-50 K)": "Yes",
            "Geophysics (Magnetic)": "Limited",
            "Mineral Resources": "Yes"
        }),
    ]
}

fn projects() -> Vec<RawRecord> {
    vec![
        json!({
            "Initiative/Item Name": "Africa Array",
            "Status": "Active",
            "Thematic Area (Geoscientific)": "Geophysics"
        }),
        json!({
            "Initiative/Item Name": "West African Geological Survey",
            "Abstract": "Comprehensive geological mapping across West African countries to identify mineral resources and geological hazards.",
            "Thematic Area (Geoscientific)": "Geological Mapping",
            "Status": "Ongoing",
            "Lead Organization(s)": "African Union Commission",
            "Start Date": "2023-01-15",
            "End Date": "2025-12-31"
        }),
        json!({
            "Initiative/Item Name": "East African Rift System Study",
            "Abstract": "Advanced seismic monitoring and analysis of the East African Rift System for earthquake prediction and volcanic activity assessment.",
            "Thematic Area (Geoscientific)": "Seismic Monitoring",
            "Status": "Ongoing",
            "Lead Organization(s)": "University of Nairobi, Kenya",
            "Start Date": "2022-06-01",
            "End Date": "2024-05-31"
        }),
        json!({
            "Initiative/Item Name": "Sahara Groundwater Assessment",
            "Abstract": "Large-scale hydrogeological study to map and assess groundwater resources across the Sahara region.",
            "Thematic Area (Geoscientific)": "Groundwater",
            "Status": "Completed",
            "Lead Organization(s)": "UNESCO",
            "Start Date": "2020-03-01",
            "End Date": "2023-02-28"
        }),
        json!({
            "Initiative/Item Name": "Southern Africa Mining Impact Study",
            "Abstract": "Environmental and geological impact assessment of mining activities across Southern African countries.",
            "Thematic Area (Geoscientific)": "Mining",
            "Status": "Planned",
            "Lead Organization(s)": "SADC Mining Sector, South Africa",
            "Start Date": "2024-04-01",
            "End Date": "2026-03-31"
        }),
    ]
}

fn platforms() -> Vec<RawRecord> {
    vec![
        json!({
            "Topic/Website": "ArcGIS",
            "What is on the Website": "GIS mapping and analysis platform.",
            "Powered by": "Esri",
            "Available Link ": "https://www.arcgis.com/"
        }),
        json!({
            "Topic/Website": "Africa GeoPortal",
            "What is on the Website": "A comprehensive platform offering geospatial tools and datasets focused on Africa, including OpenStreetMap data and satellite imagery.",
            "Powered by": "Esri",
            "Available Link ": "https://www.africageoportal.com/",
            "Logos": "assets/Africa_GeoPortal.png"
        }),
        json!({
            "Topic/Website": "Digital Earth Africa",
            "What is on the Website": "Provides open satellite data from Landsat and Sentinel processed for immediate analysis, supporting sustainable development across Africa.",
            "Powered by": "Digital Earth Africa",
            "Available Link ": "https://www.digitalearthafrica.org/",
            "Logos": "assets/Digital_Earth_Africa.png"
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize::normalize_project;
    use crate::catalog::types::ProjectCategory;

    #[test]
    fn test_every_domain_has_fallback() {
        for domain in Domain::ALL {
            assert!(!fallback_records(domain).is_empty());
        }
    }

    #[test]
    fn test_project_fallback_leads_with_africa_array() {
        let records = fallback_records(Domain::Projects);
        let first = normalize_project(&records[0]);
        assert_eq!(first.title, "Africa Array");
        assert_eq!(first.category, ProjectCategory::Geological);
    }

    #[test]
    fn test_project_fallback_has_one_mining_project() {
        let mining = fallback_records(Domain::Projects)
            .iter()
            .map(normalize_project)
            .filter(|p| p.category == ProjectCategory::Mining)
            .count();
        assert_eq!(mining, 1);
    }
}
