use std::collections::BTreeMap;

use serde::Serialize;

/// One object from a source JSON array, keys as authored upstream.
pub type RawRecord = serde_json::Value;

/// Which catalog a raw record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Datasets,
    Projects,
    Platforms,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Datasets, Domain::Projects, Domain::Platforms];

    /// Resource path relative to the configured data base.
    pub fn resource(&self) -> &'static str {
        match self {
            Domain::Datasets => "data/datasets.json",
            Domain::Projects => "data/projects.json",
            Domain::Platforms => "data/platforms.json",
        }
    }
}

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ongoing,
    Completed,
    Upcoming,
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ongoing => "ongoing",
            Status::Completed => "completed",
            Status::Upcoming => "upcoming",
            Status::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Ongoing => "Ongoing",
            Status::Completed => "Completed",
            Status::Upcoming => "Upcoming",
            Status::Unknown => "Unknown",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Status::Ongoing => "status-ongoing",
            Status::Completed => "status-completed",
            Status::Upcoming => "status-upcoming",
            Status::Unknown => "status-unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Geological,
    Hydrology,
    Seismic,
    Mining,
    Environmental,
    Energy,
    Research,
    General,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Geological => "geological",
            ProjectCategory::Hydrology => "hydrology",
            ProjectCategory::Seismic => "seismic",
            ProjectCategory::Mining => "mining",
            ProjectCategory::Environmental => "environmental",
            ProjectCategory::Energy => "energy",
            ProjectCategory::Research => "research",
            ProjectCategory::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::Geological => "Geological",
            ProjectCategory::Hydrology => "Hydrology",
            ProjectCategory::Seismic => "Seismic Studies",
            ProjectCategory::Mining => "Mining & Resources",
            ProjectCategory::Environmental => "Environmental",
            ProjectCategory::Energy => "Energy",
            ProjectCategory::Research => "Research",
            ProjectCategory::General => "General",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ProjectCategory::Geological => "fas fa-mountain",
            ProjectCategory::Hydrology => "fas fa-tint",
            ProjectCategory::Seismic => "fas fa-wave-square",
            ProjectCategory::Mining => "fas fa-gem",
            ProjectCategory::Environmental => "fas fa-leaf",
            ProjectCategory::Energy => "fas fa-bolt",
            ProjectCategory::Research => "fas fa-microscope",
            ProjectCategory::General => "fas fa-project-diagram",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformCategory {
    Geoportal,
    Satellite,
    EarthObservation,
    Gis,
    OpenData,
    Surveying,
    Climate,
    General,
}

impl PlatformCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformCategory::Geoportal => "geoportal",
            PlatformCategory::Satellite => "satellite",
            PlatformCategory::EarthObservation => "earth-observation",
            PlatformCategory::Gis => "gis",
            PlatformCategory::OpenData => "open-data",
            PlatformCategory::Surveying => "surveying",
            PlatformCategory::Climate => "climate",
            PlatformCategory::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformCategory::Geoportal => "GeoPortal",
            PlatformCategory::Satellite => "Satellite Data",
            PlatformCategory::EarthObservation => "Earth Observation",
            PlatformCategory::Gis => "GIS Platform",
            PlatformCategory::OpenData => "Open Data",
            PlatformCategory::Surveying => "Surveying & Mapping",
            PlatformCategory::Climate => "Climate & Weather",
            PlatformCategory::General => "General Platform",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PlatformCategory::Geoportal => "fas fa-globe",
            PlatformCategory::Satellite => "fas fa-satellite",
            PlatformCategory::EarthObservation => "fas fa-eye",
            PlatformCategory::Gis => "fas fa-map",
            PlatformCategory::OpenData => "fas fa-database",
            PlatformCategory::Surveying => "fas fa-ruler-combined",
            PlatformCategory::Climate => "fas fa-cloud-sun",
            PlatformCategory::General => "fas fa-layer-group",
        }
    }
}

/// Coverage of a platform, either a single country, a sub-region, the
/// continent, or global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformRegion {
    Nigeria,
    Malawi,
    Namibia,
    SouthAfrica,
    WestAfrica,
    EastAfrica,
    SouthernAfrica,
    Continental,
    Global,
}

impl PlatformRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformRegion::Nigeria => "nigeria",
            PlatformRegion::Malawi => "malawi",
            PlatformRegion::Namibia => "namibia",
            PlatformRegion::SouthAfrica => "south-africa",
            PlatformRegion::WestAfrica => "west-africa",
            PlatformRegion::EastAfrica => "east-africa",
            PlatformRegion::SouthernAfrica => "southern-africa",
            PlatformRegion::Continental => "continental",
            PlatformRegion::Global => "global",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformRegion::Nigeria => "Nigeria",
            PlatformRegion::Malawi => "Malawi",
            PlatformRegion::Namibia => "Namibia",
            PlatformRegion::SouthAfrica => "South Africa",
            PlatformRegion::WestAfrica => "West Africa",
            PlatformRegion::EastAfrica => "East Africa",
            PlatformRegion::SouthernAfrica => "Southern Africa",
            PlatformRegion::Continental => "Continental",
            PlatformRegion::Global => "Global",
        }
    }

    /// Badge style: "country", "regional", "continental" or "global".
    pub fn badge_kind(&self) -> &'static str {
        match self {
            PlatformRegion::Nigeria
            | PlatformRegion::Malawi
            | PlatformRegion::Namibia
            | PlatformRegion::SouthAfrica => "country",
            PlatformRegion::WestAfrica
            | PlatformRegion::EastAfrica
            | PlatformRegion::SouthernAfrica => "regional",
            PlatformRegion::Continental => "continental",
            PlatformRegion::Global => "global",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    pub status: Status,
    /// Gazetteer country, "Multi-country" or "International".
    pub country: String,
    pub organization: String,
    pub start_date: String,
    pub end_date: String,
    /// Empty when the source has no link.
    pub website: String,
    pub initiative_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub description: String,
    pub provider: String,
    /// Cleaned link, empty when the source has none.
    pub url: String,
    pub logo: String,
    pub category: PlatformCategory,
    pub region: PlatformRegion,
    /// Never empty.
    pub features: Vec<String>,
    pub kind: String,
}

/// One row of the geodata inventory: a country and the availability of
/// every surveyed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub id: String,
    pub country: String,
    pub region: String,
    /// Source field key -> raw availability value ("Yes", "Limited", ...).
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Project(Project),
    Platform(Platform),
    Dataset(Dataset),
}
