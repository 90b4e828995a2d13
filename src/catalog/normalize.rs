//! Raw source records -> canonical records.
//!
//! Every derived field comes from an ordered rule table evaluated top to
//! bottom; the first rule that matches wins. Facet option lists are built
//! from these derived values, so reordering a table changes which tag
//! absorbs ambiguous records.

use std::collections::BTreeMap;

use serde_json::Value;

use super::slugify;
use super::types::{
    Dataset, Domain, Platform, PlatformCategory, PlatformRegion, Project, ProjectCategory,
    RawRecord, Record, Status,
};

/// Keyword condition over a lower-cased haystack.
#[derive(Debug, Clone, Copy)]
pub enum Match {
    /// Any keyword is a substring.
    Any(&'static [&'static str]),
    /// Every keyword is a substring.
    All(&'static [&'static str]),
}

impl Match {
    pub fn test(&self, haystack: &str) -> bool {
        match self {
            Match::Any(words) => words.iter().any(|w| haystack.contains(w)),
            Match::All(words) => words.iter().all(|w| haystack.contains(w)),
        }
    }
}

pub type Rule<T> = (Match, T);

pub const PROJECT_CATEGORY_RULES: &[Rule<ProjectCategory>] = &[
    (
        Match::Any(&["geophysics", "geological", "geology"]),
        ProjectCategory::Geological,
    ),
    (Match::Any(&["groundwater", "hydro"]), ProjectCategory::Hydrology),
    (Match::Any(&["seismic", "earthquake"]), ProjectCategory::Seismic),
    (
        Match::Any(&["mineral", "mining", "copper", "gold", "iron"]),
        ProjectCategory::Mining,
    ),
    (
        Match::Any(&["climate", "environmental"]),
        ProjectCategory::Environmental,
    ),
    (Match::Any(&["geothermal", "energy"]), ProjectCategory::Energy),
    (Match::Any(&["research", "information"]), ProjectCategory::Research),
];

// "inactive" contains "active", so inactive projects land in the first rule.
pub const STATUS_RULES: &[Rule<Status>] = &[
    (Match::Any(&["active", "ongoing"]), Status::Ongoing),
    (Match::Any(&["inactive", "completed"]), Status::Completed),
    (Match::Any(&["planned", "upcoming"]), Status::Upcoming),
];

/// Matched case-sensitively against the lead organization.
pub const COUNTRY_GAZETTEER: &[&str] = &[
    "South Africa",
    "Nigeria",
    "Kenya",
    "Ghana",
    "Tanzania",
    "Uganda",
    "Zambia",
    "Zimbabwe",
    "Botswana",
    "Namibia",
    "Morocco",
    "Algeria",
    "Egypt",
    "Ethiopia",
    "Gabon",
    "Mali",
    "Senegal",
    "Chad",
    "Niger",
    "Burkina Faso",
    "Ivory Coast",
    "Cameroon",
    "Angola",
    "Mozambique",
    "Madagascar",
    "Tunisia",
    "Libya",
    "Sudan",
];

pub const MULTI_COUNTRY: &str = "Multi-country";
pub const INTERNATIONAL: &str = "International";

pub const PLATFORM_CATEGORY_RULES: &[Rule<PlatformCategory>] = &[
    (Match::Any(&["geoportal", "portal"]), PlatformCategory::Geoportal),
    (
        Match::Any(&["satellite", "landsat", "sentinel"]),
        PlatformCategory::Satellite,
    ),
    (
        Match::Any(&["earth observation", "remote sensing"]),
        PlatformCategory::EarthObservation,
    ),
    (Match::Any(&["gis", "arcgis"]), PlatformCategory::Gis),
    (Match::All(&["data", "open"]), PlatformCategory::OpenData),
    (Match::Any(&["survey", "mapping"]), PlatformCategory::Surveying),
    (
        Match::Any(&["weather", "climate", "meteorological"]),
        PlatformCategory::Climate,
    ),
];

pub const PLATFORM_REGION_RULES: &[Rule<PlatformRegion>] = &[
    (Match::Any(&["nigeria"]), PlatformRegion::Nigeria),
    (Match::Any(&["malawi"]), PlatformRegion::Malawi),
    (Match::Any(&["namibia"]), PlatformRegion::Namibia),
    (Match::Any(&["south africa"]), PlatformRegion::SouthAfrica),
    (
        Match::Any(&["west africa", "western africa"]),
        PlatformRegion::WestAfrica,
    ),
    (
        Match::Any(&["east africa", "eastern africa"]),
        PlatformRegion::EastAfrica,
    ),
    (Match::Any(&["southern africa"]), PlatformRegion::SouthernAfrica),
    (Match::Any(&["africa", "african"]), PlatformRegion::Continental),
];

/// Unlike the other tables, every matching feature rule contributes.
pub const FEATURE_RULES: &[Rule<&str>] = &[
    (Match::Any(&["satellite"]), "Satellite Data"),
    (Match::Any(&["openstreetmap", "osm"]), "OpenStreetMap"),
    (Match::Any(&["landsat"]), "Landsat"),
    (Match::Any(&["sentinel"]), "Sentinel"),
    (Match::Any(&["gis"]), "GIS Tools"),
    (Match::Any(&["analysis"]), "Data Analysis"),
    (Match::Any(&["download"]), "Data Download"),
    (Match::Any(&["training"]), "Training"),
    (Match::Any(&["api"]), "API Access"),
];

pub const DEFAULT_FEATURE: &str = "Data Access";

pub const PLATFORM_TYPE_RULES: &[Rule<&str>] = &[
    (Match::Any(&["portal", "platform"]), "Data Platform"),
    (
        Match::Any(&["satellite", "earth observation"]),
        "Satellite Platform",
    ),
    (Match::Any(&["gis", "mapping"]), "GIS Platform"),
    (Match::Any(&["training", "education"]), "Educational Platform"),
    (Match::Any(&["network", "connect"]), "Network Platform"),
];

pub const DEFAULT_PLATFORM_TYPE: &str = "Geospatial Platform";

pub const REGION_BY_COUNTRY: &[(&str, &str)] = &[
    ("Algeria", "North Africa"),
    ("Egypt", "North Africa"),
    ("Libya", "North Africa"),
    ("Morocco", "North Africa"),
    ("Tunisia", "North Africa"),
    ("Sudan", "North Africa"),
    ("Nigeria", "West Africa"),
    ("Ghana", "West Africa"),
    ("Senegal", "West Africa"),
    ("Mali", "West Africa"),
    ("Burkina Faso", "West Africa"),
    ("Niger", "West Africa"),
    ("Guinea", "West Africa"),
    ("Sierra Leone", "West Africa"),
    ("Liberia", "West Africa"),
    ("Côte d'Ivoire", "West Africa"),
    ("Kenya", "East Africa"),
    ("Ethiopia", "East Africa"),
    ("Tanzania", "East Africa"),
    ("Uganda", "East Africa"),
    ("Rwanda", "East Africa"),
    ("Burundi", "East Africa"),
    ("Somalia", "East Africa"),
    ("Djibouti", "East Africa"),
    ("South Africa", "Southern Africa"),
    ("Botswana", "Southern Africa"),
    ("Namibia", "Southern Africa"),
    ("Zimbabwe", "Southern Africa"),
    ("Zambia", "Southern Africa"),
    ("Malawi", "Southern Africa"),
    ("Mozambique", "Southern Africa"),
    ("Lesotho", "Southern Africa"),
    ("Swaziland", "Southern Africa"),
    ("Angola", "Central Africa"),
    ("Democratic Republic of Congo", "Central Africa"),
    ("Republic of Congo", "Central Africa"),
    ("Cameroon", "Central Africa"),
    ("Central African Republic", "Central Africa"),
    ("Chad", "Central Africa"),
    ("Gabon", "Central Africa"),
    ("Equatorial Guinea", "Central Africa"),
];

pub const DEFAULT_REGION: &str = "Africa";

/// First rule whose condition holds, else `default`.
pub fn first_match<T: Copy>(haystack: &str, rules: &[Rule<T>], default: T) -> T {
    rules
        .iter()
        .find(|(when, _)| when.test(haystack))
        .map(|(_, tag)| *tag)
        .unwrap_or(default)
}

/// String value of `key`, or `None` when it is missing, not a string, or
/// blank. Blank counts as missing because spreadsheet exports pad empty
/// cells with a single space.
fn text<'a>(raw: &'a RawRecord, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn text_or(raw: &RawRecord, key: &str, default: &str) -> String {
    text(raw, key).unwrap_or(default).to_string()
}

pub fn project_category(thematic_area: Option<&str>) -> ProjectCategory {
    match thematic_area {
        Some(area) => first_match(
            &area.to_lowercase(),
            PROJECT_CATEGORY_RULES,
            ProjectCategory::General,
        ),
        None => ProjectCategory::General,
    }
}

pub fn project_status(status: Option<&str>) -> Status {
    match status {
        Some(s) => first_match(&s.to_lowercase(), STATUS_RULES, Status::Ongoing),
        None => Status::Unknown,
    }
}

pub fn project_country(organization: Option<&str>) -> String {
    let Some(org) = organization else {
        return MULTI_COUNTRY.to_string();
    };
    if let Some(country) = COUNTRY_GAZETTEER.iter().find(|c| org.contains(*c)) {
        return country.to_string();
    }
    // "Africa" also covers "African".
    if org.contains("Africa") {
        MULTI_COUNTRY.to_string()
    } else {
        INTERNATIONAL.to_string()
    }
}

pub fn platform_category(name: &str, description: &str) -> PlatformCategory {
    let haystack = format!("{} {}", name, description).to_lowercase();
    first_match(&haystack, PLATFORM_CATEGORY_RULES, PlatformCategory::General)
}

pub fn platform_region(name: &str, description: &str) -> PlatformRegion {
    let haystack = format!("{} {}", name, description).to_lowercase();
    first_match(&haystack, PLATFORM_REGION_RULES, PlatformRegion::Global)
}

pub fn platform_features(description: &str) -> Vec<String> {
    let desc = description.to_lowercase();
    let features: Vec<String> = FEATURE_RULES
        .iter()
        .filter(|(when, _)| when.test(&desc))
        .map(|(_, tag)| tag.to_string())
        .collect();
    if features.is_empty() {
        vec![DEFAULT_FEATURE.to_string()]
    } else {
        features
    }
}

pub fn platform_type(description: &str) -> String {
    first_match(
        &description.to_lowercase(),
        PLATFORM_TYPE_RULES,
        DEFAULT_PLATFORM_TYPE,
    )
    .to_string()
}

/// Normalize the free-form "Available Link" column into an absolute URL.
/// Leading `name:` that reads as a URL scheme rather than a host.
fn scheme(url: &str) -> Option<&str> {
    let (name, _) = url.split_once(':')?;
    let mut chars = name.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    (starts_alpha && chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-'))
        .then_some(name)
}

/// Web link safe to put in `href`: bare hosts get `https://`, and any
/// scheme other than http(s) yields an empty string.
pub fn clean_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("A Data Platform For Africa:") {
        return "https://dunia.catalysts.africa/".to_string();
    }
    match scheme(url) {
        Some(name) if name.eq_ignore_ascii_case("http") || name.eq_ignore_ascii_case("https") => {
            url.to_string()
        }
        Some(_) => String::new(),
        None => format!("https://{}", url),
    }
}

pub fn dataset_region(country: &str) -> String {
    REGION_BY_COUNTRY
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, region)| *region)
        .unwrap_or(DEFAULT_REGION)
        .to_string()
}

pub fn normalize_project(raw: &RawRecord) -> Project {
    let title = text_or(raw, "Initiative/Item Name", "Untitled Project");
    let organization = text(raw, "Lead Organization(s)");
    Project {
        id: slugify(&title),
        description: text_or(raw, "Abstract", "No description available"),
        category: project_category(text(raw, "Thematic Area (Geoscientific)")),
        status: project_status(text(raw, "Status")),
        country: project_country(organization),
        organization: organization.unwrap_or("Unknown Organization").to_string(),
        start_date: text_or(raw, "Start Date", "Unknown"),
        end_date: text_or(raw, "End Date", "Unknown"),
        website: clean_url(text(raw, "Website/Link").unwrap_or("")),
        initiative_type: text_or(raw, "Initiative type", "Project"),
        title,
    }
}

pub fn normalize_platform(raw: &RawRecord) -> Platform {
    let name = text_or(raw, "Topic/Website", "Unnamed Platform");
    // Rules run on the source text, not on the placeholders.
    let source_name = text(raw, "Topic/Website").unwrap_or("");
    let source_desc = text(raw, "What is on the Website").unwrap_or("");
    Platform {
        id: slugify(&name),
        description: text_or(raw, "What is on the Website", "No description available"),
        provider: text_or(raw, "Powered by", "Unknown Provider"),
        url: clean_url(text(raw, "Available Link ").unwrap_or("")),
        logo: text(raw, "Logos")
            .map(|l| l.trim().replace("assests", "assets"))
            .unwrap_or_default(),
        category: platform_category(source_name, source_desc),
        region: platform_region(source_name, source_desc),
        features: platform_features(source_desc),
        kind: platform_type(source_desc),
        name,
    }
}

pub fn normalize_dataset(raw: &RawRecord) -> Dataset {
    let country = text_or(raw, "Country", "Unknown Country");
    let mut fields = BTreeMap::new();
    if let Some(obj) = raw.as_object() {
        for (key, value) in obj {
            if key == "Country" {
                continue;
            }
            let value = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Null => continue,
                other => other.to_string(),
            };
            fields.insert(key.clone(), value);
        }
    }
    Dataset {
        id: slugify(text(raw, "Country").unwrap_or("unknown")),
        region: dataset_region(&country),
        country,
        fields,
    }
}

pub fn normalize(raw: &RawRecord, domain: Domain) -> Record {
    match domain {
        Domain::Projects => Record::Project(normalize_project(raw)),
        Domain::Platforms => Record::Platform(normalize_platform(raw)),
        Domain::Datasets => Record::Dataset(normalize_dataset(raw)),
    }
}
