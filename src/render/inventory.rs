use super::{el, icon, Node};
use crate::catalog::inventory::{
    country_stats, data_matrix, field_label, Availability, FieldAnalysis,
};
use crate::catalog::types::Dataset;

fn stat_card(id: &str, label: &str, count: usize) -> Node {
    el("div")
        .class("stat-card")
        .child(el("span").attr("id", id).class("stat-number").text(count.to_string()))
        .child(el("span").class("stat-label").text(label))
        .into()
}

/// Availability matrix of one country, grouped by field category.
pub fn matrix(dataset: &Dataset) -> Node {
    el("div")
        .class("matrix-grid")
        .children(data_matrix(dataset).into_iter().map(|group| {
            el("div")
                .class("matrix-category")
                .child(el("h5").text(group.label))
                .child(el("div").class("matrix-fields").children(group.cells.into_iter().map(
                    |cell| {
                        el("div")
                            .class(&format!("matrix-field {}", cell.level.css_class()))
                            .child(el("span").class("field-name").text(cell.label))
                            .child(el("span").class("field-status").text(cell.value))
                    },
                )))
        }))
        .into()
}

/// Country header, stat cards and matrix.
pub fn country_analysis(dataset: &Dataset) -> Node {
    let stats = country_stats(dataset);
    el("div")
        .attr("id", "countryAnalysis")
        .class("country-analysis")
        .child(
            el("div")
                .class("country-header")
                .child(el("h3").attr("id", "countryName").text(dataset.country.as_str()))
                .child(el("p").attr("id", "countryRegion").text(dataset.region.as_str())),
        )
        .child(
            el("div")
                .class("country-stats")
                .child(stat_card("availableDatasets", "Available", stats.available))
                .child(stat_card("partialDatasets", "Limited", stats.limited))
                .child(stat_card("missingDatasets", "Missing", stats.missing)),
        )
        .child(el("div").attr("id", "dataMatrix").child(matrix(dataset)))
        .into()
}

fn country_list(level: Availability, countries: &[String]) -> Node {
    let body = if countries.is_empty() {
        el("p").class("none").text("None")
    } else {
        el("ul").children(countries.iter().map(|c| el("li").text(c.as_str())))
    };
    el("div")
        .class(&format!("country-list {}", level.css_class()))
        .child(el("h5").text(level.label()))
        .child(body)
        .into()
}

/// Map title and availability summary of one field.
pub fn field_summary(field: &str, analysis: &FieldAnalysis) -> Node {
    let [available, limited, none] = analysis.counts();
    el("div")
        .class("field-summary")
        .child(
            el("h3")
                .attr("id", "mapTitle")
                .child(icon("fas fa-map"))
                .text(format!(" {}", field_label(field))),
        )
        .child(
            el("div")
                .class("summary-stats")
                .child(stat_card("availableCount", "Available", available))
                .child(stat_card("limitedCount", "Limited", limited))
                .child(stat_card("noneCount", "Not Available", none)),
        )
        .child(country_list(Availability::Available, &analysis.available))
        .child(country_list(Availability::Limited, &analysis.limited))
        .child(country_list(Availability::None, &analysis.none))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback::fallback_records;
    use crate::catalog::inventory::analyze_field;
    use crate::catalog::normalize::normalize_dataset;
    use crate::catalog::types::Domain;

    fn datasets() -> Vec<Dataset> {
        fallback_records(Domain::Datasets)
            .iter()
            .map(normalize_dataset)
            .collect()
    }

    #[test]
    fn test_matrix_marks_missing_fields() {
        let nigeria = &datasets()[1];
        let html = matrix(nigeria).to_html();
        assert!(html.contains("<h5>Geological Mapping</h5>"));
        assert!(html.contains(
            "<div class=\"matrix-field missing\"><span class=\"field-name\">Geochemistry (Soil)</span><span class=\"field-status\">No</span></div>"
        ));
        assert!(html.contains(
            "<div class=\"matrix-field limited\"><span class=\"field-name\">Geophysics (Magnetic)</span><span class=\"field-status\">Limited</span></div>"
        ));
    }

    #[test]
    fn test_field_summary_lists_countries() {
        let all = datasets();
        let analysis = analyze_field(&all, "Geochemistry (Soil)");
        let text = field_summary("Geochemistry (Soil)", &analysis).text_content();
        assert!(text.contains("Geochemistry (Soil)"));
        assert!(text.contains("South Africa"));
        assert!(text.contains("Nigeria"));
        assert!(text.contains("AvailableNone"));
    }

    #[test]
    fn test_country_analysis_stats() {
        let html = country_analysis(&datasets()[0]).to_html();
        assert!(html.contains("<span id=\"availableDatasets\" class=\"stat-number\">3</span>"));
        assert!(html.contains("<p id=\"countryRegion\">Southern Africa</p>"));
    }
}
