//! Geodata inventory: which survey fields each country has data for.

use serde_json::{json, Value};

use super::types::Dataset;

pub struct FieldGroup {
    pub key: &'static str,
    pub label: &'static str,
    /// (source column, display label), in display order.
    pub fields: &'static [(&'static str, &'static str)],
}

pub const FIELD_GROUPS: &[FieldGroup] = &[
    FieldGroup {
        key: "mapping",
        label: "Geological Mapping",
        fields: &[
            ("Map Scales (25-50 K)", "Geological Map Scales (25-50K)"),
            ("Map Scales (<50-100 K)", "Geological Map Scales (50-100K)"),
            ("Map Scales (100 -250 K)", "Geological Map Scales (100-250K)"),
            ("Map Scales (500-1000 K)", "Geological Map Scales (500K-1M)"),
            ("Map Scales (1 mio)", "Geological Map Scales (1M)"),
            ("Map Scales (> 1000K)", "Geological Map Scales (>1M)"),
        ],
    },
    FieldGroup {
        key: "geophysics",
        label: "Geophysics",
        fields: &[
            ("Geophysics (Electromagnetic)", "Geophysics (Electromagnetic)"),
            ("Geophysics (Magnetic)", "Geophysics (Magnetic)"),
            ("Geophysics (Gravity)", "Geophysics (Gravity)"),
            ("Geophysics (Seismic)", "Geophysics (Seismic)"),
            ("Geophysics (Radiometric)", "Geophysics (Radiometric)"),
        ],
    },
    FieldGroup {
        key: "geochemistry",
        label: "Geochemistry",
        fields: &[
            ("Geochemistry (Soil)", "Geochemistry (Soil)"),
            ("Geochemistry (Stream)", "Geochemistry (Stream)"),
            ("Geochemistry (Rock)", "Geochemistry (Rock)"),
            ("Geochemistry (Water)", "Geochemistry (Water)"),
        ],
    },
    FieldGroup {
        key: "engineering",
        label: "Engineering Geology",
        fields: &[
            (
                "Engineering Mapping (Engineering Mapping)",
                "Engineering Geology Mapping",
            ),
            (
                "Engineering Mapping (Geohazard)",
                "Engineering Geology (Geohazard)",
            ),
            (
                "Engineering Mapping (Risk Assessment)",
                "Engineering Geology (Risk Assessment)",
            ),
        ],
    },
    FieldGroup {
        key: "economic",
        label: "Economic Geology",
        fields: &[
            (
                "Economic Geology (Ground Water Assessment)",
                "Economic Geology (Groundwater)",
            ),
            (
                "Economic Geology (Air Quality)",
                "Economic Geology (Air Quality)",
            ),
            (
                "Economic Geology (Risk Assessment)",
                "Economic Geology (Risk Assessment)",
            ),
            ("Mineral Resources", "Mineral Resources"),
        ],
    },
    FieldGroup {
        key: "hydrogeology",
        label: "Hydrogeology",
        fields: &[
            ("Hydrogeology", "Hydrogeology"),
            ("Groundwater", "Groundwater Assessment"),
        ],
    },
];

/// Display label of a source column; unknown columns show as-is.
pub fn field_label(field: &str) -> &str {
    FIELD_GROUPS
        .iter()
        .flat_map(|g| g.fields.iter())
        .find(|(key, _)| *key == field)
        .map(|(_, label)| *label)
        .unwrap_or(field)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Limited,
    None,
}

impl Availability {
    /// `Yes` is available, `Limited`/`Partial` limited, anything else
    /// (missing included) none.
    pub fn classify(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("Yes") => Availability::Available,
            Some("Limited") | Some("Partial") => Availability::Limited,
            _ => Availability::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Limited => "Limited",
            Availability::None => "Not Available",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Limited => "limited",
            Availability::None => "missing",
        }
    }

    pub fn colour(&self) -> &'static str {
        match self {
            Availability::Available => "#4CAF50",
            Availability::Limited => "#FF9800",
            Availability::None => "#F44336",
        }
    }
}

pub const NO_DATA_COLOUR: &str = "#cccccc";

impl Dataset {
    pub fn availability(&self, field: &str) -> Availability {
        Availability::classify(self.fields.get(field).map(String::as_str))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAnalysis {
    pub available: Vec<String>,
    pub limited: Vec<String>,
    pub none: Vec<String>,
}

impl FieldAnalysis {
    pub fn counts(&self) -> [usize; 3] {
        [self.available.len(), self.limited.len(), self.none.len()]
    }
}

/// Bucket every country by its availability for `field`.
pub fn analyze_field(datasets: &[Dataset], field: &str) -> FieldAnalysis {
    let mut analysis = FieldAnalysis::default();
    for d in datasets {
        let bucket = match d.availability(field) {
            Availability::Available => &mut analysis.available,
            Availability::Limited => &mut analysis.limited,
            Availability::None => &mut analysis.none,
        };
        bucket.push(d.country.clone());
    }
    analysis
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountryStats {
    pub available: usize,
    pub limited: usize,
    pub missing: usize,
}

/// Counts over every column the country row carries.
pub fn country_stats(dataset: &Dataset) -> CountryStats {
    let mut stats = CountryStats::default();
    for value in dataset.fields.values() {
        match Availability::classify(Some(value)) {
            Availability::Available => stats.available += 1,
            Availability::Limited => stats.limited += 1,
            Availability::None => stats.missing += 1,
        }
    }
    stats
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixCell {
    pub field: &'static str,
    pub label: &'static str,
    pub level: Availability,
    /// Raw value, `No` when the column is absent.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixGroup {
    pub label: &'static str,
    pub cells: Vec<MatrixCell>,
}

/// One row per catalogued field, grouped like `FIELD_GROUPS`.
pub fn data_matrix(dataset: &Dataset) -> Vec<MatrixGroup> {
    FIELD_GROUPS
        .iter()
        .map(|group| MatrixGroup {
            label: group.label,
            cells: group
                .fields
                .iter()
                .map(|&(field, label)| {
                    let raw = dataset.fields.get(field).filter(|v| !v.is_empty());
                    MatrixCell {
                        field,
                        label,
                        level: Availability::classify(raw.map(String::as_str)),
                        value: raw.cloned().unwrap_or_else(|| "No".to_string()),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Country name of a boundary feature (`NAME`, else `name`).
pub fn feature_country(feature: &Value) -> Option<&str> {
    let props = feature.get("properties")?;
    props
        .get("NAME")
        .and_then(Value::as_str)
        .or_else(|| props.get("name").and_then(Value::as_str))
}

/// Copy of `boundaries` with a Leaflet `style` object and an
/// `availability` label merged into each feature's properties.
pub fn choropleth(boundaries: &Value, datasets: &[Dataset], field: &str) -> Value {
    let mut out = boundaries.clone();
    let Some(features) = out.get_mut("features").and_then(Value::as_array_mut) else {
        return out;
    };
    for feature in features.iter_mut() {
        let dataset = feature_country(feature)
            .and_then(|name| datasets.iter().find(|d| d.country == name));
        let (style, label) = match dataset {
            Some(d) => {
                let level = d.availability(field);
                (
                    json!({
                        "fillColor": level.colour(),
                        "weight": 2,
                        "opacity": 1,
                        "color": "#ffffff",
                        "fillOpacity": 0.8
                    }),
                    level.label(),
                )
            }
            None => (
                json!({
                    "fillColor": NO_DATA_COLOUR,
                    "weight": 1,
                    "opacity": 1,
                    "color": "#999999",
                    "fillOpacity": 0.7
                }),
                "No data",
            ),
        };
        if !feature.get("properties").is_some_and(Value::is_object) {
            feature["properties"] = json!({});
        }
        feature["properties"]["style"] = style;
        feature["properties"]["availability"] = json!(label);
    }
    out
}

/// Chart.js doughnut config for one field analysis.
pub fn doughnut_chart(analysis: &FieldAnalysis) -> Value {
    let levels = [
        Availability::Available,
        Availability::Limited,
        Availability::None,
    ];
    json!({
        "type": "doughnut",
        "data": {
            "labels": levels.iter().map(Availability::label).collect::<Vec<_>>(),
            "datasets": [{
                "data": analysis.counts(),
                "backgroundColor": levels.iter().map(Availability::colour).collect::<Vec<_>>(),
                "borderWidth": 2,
                "borderColor": "#ffffff"
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {
                    "position": "bottom",
                    "labels": { "padding": 20, "usePointStyle": true }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize::normalize_dataset;

    fn datasets() -> Vec<Dataset> {
        [
            json!({"Country": "South Africa", "Geophysics (Magnetic)": "Yes", "Geochemistry (Soil)": "Limited"}),
            json!({"Country": "Nigeria", "Geophysics (Magnetic)": "Partial"}),
            json!({"Country": "Kenya", "Geophysics (Magnetic)": "No", "Mineral Resources": "Yes"}),
        ]
        .iter()
        .map(normalize_dataset)
        .collect()
    }

    #[test]
    fn test_classify() {
        assert_eq!(Availability::classify(Some("Yes")), Availability::Available);
        assert_eq!(Availability::classify(Some("Partial")), Availability::Limited);
        assert_eq!(Availability::classify(Some("yes")), Availability::None);
        assert_eq!(Availability::classify(None), Availability::None);
    }

    #[test]
    fn test_analyze_field() {
        let a = analyze_field(&datasets(), "Geophysics (Magnetic)");
        assert_eq!(a.available, vec!["South Africa"]);
        assert_eq!(a.limited, vec!["Nigeria"]);
        assert_eq!(a.none, vec!["Kenya"]);
        assert_eq!(a.counts(), [1, 1, 1]);
    }

    #[test]
    fn test_field_label() {
        assert_eq!(
            field_label("Map Scales (1 mio)"),
            "Geological Map Scales (1M)"
        );
        assert_eq!(field_label("Something else"), "Something else");
    }

    #[test]
    fn test_country_stats() {
        let ds = datasets();
        assert_eq!(
            country_stats(&ds[0]),
            CountryStats { available: 1, limited: 1, missing: 0 }
        );
        assert_eq!(
            country_stats(&ds[2]),
            CountryStats { available: 1, limited: 0, missing: 1 }
        );
    }

    #[test]
    fn test_data_matrix_covers_every_field() {
        let ds = datasets();
        let matrix = data_matrix(&ds[0]);
        assert_eq!(matrix.len(), FIELD_GROUPS.len());
        let geophysics = matrix.iter().find(|g| g.label == "Geophysics").unwrap();
        let magnetic = geophysics
            .cells
            .iter()
            .find(|c| c.field == "Geophysics (Magnetic)")
            .unwrap();
        assert_eq!(magnetic.level, Availability::Available);
        let gravity = geophysics
            .cells
            .iter()
            .find(|c| c.field == "Geophysics (Gravity)")
            .unwrap();
        assert_eq!(gravity.value, "No");
        assert_eq!(gravity.level, Availability::None);
    }

    #[test]
    fn test_choropleth_styles_features() {
        let boundaries = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"NAME": "South Africa"}, "geometry": null},
                {"type": "Feature", "properties": {"name": "Nigeria"}, "geometry": null},
                {"type": "Feature", "properties": {"NAME": "Chad"}, "geometry": null},
                {"type": "Feature", "geometry": null}
            ]
        });
        let styled = choropleth(&boundaries, &datasets(), "Geophysics (Magnetic)");
        let features = styled["features"].as_array().unwrap();
        assert_eq!(features[0]["properties"]["style"]["fillColor"], "#4CAF50");
        assert_eq!(features[1]["properties"]["style"]["fillColor"], "#FF9800");
        assert_eq!(features[1]["properties"]["availability"], "Limited");
        assert_eq!(features[2]["properties"]["style"]["fillColor"], NO_DATA_COLOUR);
        assert_eq!(features[3]["properties"]["availability"], "No data");
        // Source is untouched.
        assert!(boundaries["features"][0]["properties"].get("style").is_none());
    }

    #[test]
    fn test_doughnut_chart() {
        let chart = doughnut_chart(&analyze_field(&datasets(), "Mineral Resources"));
        assert_eq!(chart["type"], "doughnut");
        assert_eq!(chart["data"]["datasets"][0]["data"], json!([1, 0, 2]));
        assert_eq!(chart["data"]["labels"][2], "Not Available");
    }
}
