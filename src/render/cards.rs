//! Cards, list rows and detail panels for each record type.

use chrono::NaiveDate;

use super::{el, icon, truncate, Element, Node, ViewMode};
use crate::browse::stats::{Slice, DATASET_SLICES, PLATFORM_SLICES, PROJECT_SLICES};
use crate::browse::Listing;
use crate::catalog::inventory::country_stats;
use crate::catalog::types::{Dataset, Platform, PlatformRegion, Project};

const GRID_DESCRIPTION_LEN: usize = 120;
const LIST_DESCRIPTION_LEN: usize = 200;
const GRID_FEATURES: usize = 3;
const LIST_FEATURES: usize = 4;

/// `Jan 2023 - Dec 2025`. Dates that do not parse as `YYYY-MM-DD` are
/// shown as written.
pub fn format_date_range(start: &str, end: &str) -> String {
    format!("{} - {}", month_year(start), month_year(end))
}

fn month_year(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => d.format("%b %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

fn detail_item(icon_class: &str, text: &str) -> Element {
    el("div")
        .class("detail-item")
        .child(icon(icon_class))
        .child(el("span").text(text))
}

fn labelled(label: &str, value: &str) -> Element {
    el("p")
        .child(el("strong").text(format!("{}:", label)))
        .text(format!(" {}", value))
}

fn details_button(id: &str, label: &str) -> Element {
    el("button")
        .class("btn btn-outline-primary btn-sm")
        .attr("data-action", "details")
        .attr("data-id", id)
        .child(icon("fas fa-info-circle"))
        .text(format!(" {}", label))
}

fn external_link(url: &str, label: &str, class: &str) -> Element {
    el("a")
        .attr("href", url)
        .attr("target", "_blank")
        .class(class)
        .child(icon("fas fa-external-link-alt"))
        .text(format!(" {}", label))
}

fn modal(prefix: &str, title: &str, body: Element) -> Node {
    el("div")
        .class(&format!("{}-modal-overlay", prefix))
        .child(
            el("div")
                .class(&format!("{}-modal", prefix))
                .child(
                    el("div")
                        .class("modal-header")
                        .child(el("h2").text(title))
                        .child(
                            el("button")
                                .class("modal-close")
                                .attr("data-action", "close")
                                .child(icon("fas fa-times")),
                        ),
                )
                .child(el("div").class("modal-body").child(body)),
        )
        .into()
}

impl Listing for Project {
    const NOUN: &'static str = "project";
    const PLURAL: &'static str = "projects";
    const ANCHOR: &'static str = "project-grid";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn card(&self, view: ViewMode) -> Node {
        let class = match view {
            ViewMode::Grid => "project-card modern-card",
            ViewMode::List => "project-card project-list-item modern-card",
        };
        let description = match view {
            ViewMode::Grid => self.description.clone(),
            ViewMode::List => truncate(&self.description, LIST_DESCRIPTION_LEN),
        };

        let header = el("div")
            .class("project-header")
            .child(
                el("div")
                    .class("project-category")
                    .child(icon(self.category.icon()))
                    .child(el("span").text(self.category.label())),
            )
            .child(
                el("div")
                    .class(&format!("project-status {}", self.status.css_class()))
                    .text(self.status.label()),
            );

        let content = el("div")
            .class("project-content")
            .child(el("h3").class("project-title").text(self.title.as_str()))
            .child(el("p").class("project-description").text(description))
            .child(
                el("div")
                    .class("project-details")
                    .child(detail_item("fas fa-building", &self.organization))
                    .child(detail_item("fas fa-map-marker-alt", &self.country))
                    .child(detail_item(
                        "fas fa-calendar",
                        &format_date_range(&self.start_date, &self.end_date),
                    )),
            );

        let website = (!self.website.is_empty())
            .then(|| external_link(&self.website, "Website", "btn btn-primary btn-sm"));
        let footer = el("div")
            .class("project-footer")
            .child(details_button(&self.id, "View Details"))
            .maybe(website);

        el("div")
            .class(class)
            .attr("data-category", self.category.as_str())
            .attr("data-status", self.status.as_str())
            .child(header)
            .child(content)
            .child(footer)
            .into()
    }

    fn detail(&self) -> Node {
        let website = (!self.website.is_empty()).then(|| labelled("Website", &self.website));
        let body = el("div")
            .class("project-full-details")
            .child(labelled("Description", &self.description))
            .child(labelled("Organization", &self.organization))
            .child(labelled("Location", &self.country))
            .child(labelled(
                "Duration",
                &format_date_range(&self.start_date, &self.end_date),
            ))
            .child(labelled("Status", self.status.label()))
            .child(labelled("Category", self.category.label()))
            .child(labelled("Type", &self.initiative_type))
            .maybe(website);
        modal("project", &self.title, body)
    }

    fn stat_slices() -> &'static [Slice<Self>] {
        PROJECT_SLICES
    }
}

fn region_badge(region: PlatformRegion) -> Element {
    el("span")
        .class(&format!("region-badge {}", region.badge_kind()))
        .text(region.label())
}

impl Platform {
    fn logo(&self, small: bool) -> Element {
        let (wrapper, placeholder) = if small {
            ("platform-logo-small", "logo-placeholder-small")
        } else {
            ("platform-logo", "logo-placeholder")
        };
        let inner = if self.logo.is_empty() {
            el("div")
                .class(placeholder)
                .child(icon(self.category.icon()))
        } else {
            el("img")
                .attr("src", self.logo.as_str())
                .attr("alt", self.name.as_str())
        };
        el("div").class(wrapper).child(inner)
    }

    fn badges(&self) -> Element {
        el("div")
            .class("platform-badges")
            .child(region_badge(self.region))
            .child(el("span").class("platform-type").text(self.kind.as_str()))
    }

    fn grid_card(&self) -> Node {
        let mut tags: Vec<Node> = self
            .features
            .iter()
            .take(GRID_FEATURES)
            .map(|f| el("span").class("feature-tag").text(f.as_str()).into())
            .collect();
        if self.features.len() > GRID_FEATURES {
            tags.push(
                el("span")
                    .class("feature-tag more")
                    .text(format!("+{} more", self.features.len() - GRID_FEATURES))
                    .into(),
            );
        }

        let link = if self.url.is_empty() {
            el("button")
                .class("btn btn-secondary btn-sm")
                .attr("disabled", "disabled")
                .child(icon("fas fa-link-slash"))
                .text(" No Link")
        } else {
            external_link(&self.url, "Visit Platform", "btn btn-primary btn-sm")
        };

        el("div")
            .class("platform-card modern-card")
            .attr("data-category", self.category.as_str())
            .attr("data-region", self.region.as_str())
            .child(
                el("div")
                    .class("platform-header")
                    .child(self.logo(false))
                    .child(self.badges()),
            )
            .child(
                el("div")
                    .class("platform-content")
                    .child(el("h3").class("platform-title").text(self.name.as_str()))
                    .child(
                        el("p")
                            .class("platform-description")
                            .text(truncate(&self.description, GRID_DESCRIPTION_LEN)),
                    )
                    .child(
                        el("div")
                            .class("platform-details")
                            .child(detail_item("fas fa-building", &self.provider))
                            .child(detail_item(self.category.icon(), self.category.label())),
                    )
                    .child(
                        el("div")
                            .class("platform-features")
                            .child(el("strong").text("Key Features:"))
                            .child(el("div").class("feature-tags").children(tags)),
                    ),
            )
            .child(
                el("div")
                    .class("platform-footer")
                    .child(details_button(&self.id, "Details"))
                    .child(link),
            )
            .into()
    }

    fn list_row(&self) -> Node {
        let tags = self
            .features
            .iter()
            .take(LIST_FEATURES)
            .map(|f| el("span").class("feature-tag-small").text(f.as_str()));
        let visit = (!self.url.is_empty())
            .then(|| external_link(&self.url, "Visit", "btn btn-primary btn-sm"));

        el("div")
            .class("platform-list-item modern-card")
            .attr("data-category", self.category.as_str())
            .attr("data-region", self.region.as_str())
            .child(
                el("div")
                    .class("list-item-content")
                    .child(
                        el("div")
                            .class("list-item-header")
                            .child(self.logo(true))
                            .child(
                                el("div")
                                    .class("platform-info")
                                    .child(el("h4").class("platform-title").text(self.name.as_str()))
                                    .child(el("p").class("platform-provider").text(format!(
                                        "{} • {}",
                                        self.provider,
                                        self.category.label()
                                    ))),
                            )
                            .child(self.badges()),
                    )
                    .child(
                        el("p")
                            .class("platform-description")
                            .text(truncate(&self.description, LIST_DESCRIPTION_LEN)),
                    )
                    .child(el("div").class("platform-features-inline").children(tags)),
            )
            .child(
                el("div")
                    .class("list-item-actions")
                    .child(details_button(&self.id, "Details"))
                    .maybe(visit),
            )
            .into()
    }
}

impl Listing for Platform {
    const NOUN: &'static str = "platform";
    const PLURAL: &'static str = "platforms";
    const ANCHOR: &'static str = "platforms-grid";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn card(&self, view: ViewMode) -> Node {
        match view {
            ViewMode::Grid => self.grid_card(),
            ViewMode::List => self.list_row(),
        }
    }

    fn detail(&self) -> Node {
        let section = |heading: &str| el("div").class("detail-section").child(el("h4").text(heading));
        let access = (!self.url.is_empty()).then(|| {
            section("Access Platform").child(external_link(
                &self.url,
                &format!("Visit {}", self.name),
                "btn btn-primary",
            ))
        });
        let body = el("div")
            .class("platform-full-details")
            .child(section("Description").child(el("p").text(self.description.as_str())))
            .child(
                section("Platform Information")
                    .child(labelled("Provider", &self.provider))
                    .child(labelled("Type", &self.kind))
                    .child(labelled("Category", self.category.label()))
                    .child(labelled("Coverage", self.region.label())),
            )
            .child(
                section("Key Features").child(
                    el("ul").children(self.features.iter().map(|f| el("li").text(f.as_str()))),
                ),
            )
            .maybe(access);
        modal("platform", &self.name, body)
    }

    fn stat_slices() -> &'static [Slice<Self>] {
        PLATFORM_SLICES
    }
}

impl Listing for Dataset {
    const NOUN: &'static str = "country";
    const PLURAL: &'static str = "countries";
    const ANCHOR: &'static str = "categorySelect";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.country
    }

    fn card(&self, view: ViewMode) -> Node {
        let stats = country_stats(self);
        let counts = el("div")
            .class("country-stats")
            .child(
                el("span")
                    .class("stat available")
                    .text(format!("{} available", stats.available)),
            )
            .child(
                el("span")
                    .class("stat limited")
                    .text(format!("{} limited", stats.limited)),
            )
            .child(
                el("span")
                    .class("stat missing")
                    .text(format!("{} missing", stats.missing)),
            );
        let class = match view {
            ViewMode::Grid => "country-card modern-card",
            ViewMode::List => "country-list-item modern-card",
        };
        el("div")
            .class(class)
            .attr("data-region", self.region.as_str())
            .child(el("h3").class("country-name").text(self.country.as_str()))
            .child(el("p").class("country-region").text(self.region.as_str()))
            .child(counts)
            .child(details_button(&self.id, "View Analysis"))
            .into()
    }

    fn detail(&self) -> Node {
        super::inventory::country_analysis(self)
    }

    fn stat_slices() -> &'static [Slice<Self>] {
        DATASET_SLICES
    }
}
