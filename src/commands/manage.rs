use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Context as _};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use serde::Serialize;
use tracing::info;

use super::{filters_from, send_chunked, to_text};
use crate::browse::controller::Browser;
use crate::browse::stats::{aggregate, PLATFORM_SLICES, PROJECT_SLICES, TOTAL};
use crate::browse::{facet_options, ActiveFilters, Facet, FacetOption, Listing, ALL};
use crate::catalog::Catalog;
use crate::render::{Document, ViewMode};
use crate::state::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ListingKind {
    #[name = "projects"]
    Projects,
    #[name = "platforms"]
    Platforms,
    #[name = "countries"]
    Countries,
}

impl ListingKind {
    fn slug(&self) -> &'static str {
        match self {
            ListingKind::Projects => "projects",
            ListingKind::Platforms => "platforms",
            ListingKind::Countries => "countries",
        }
    }
}

/// Show the full record behind a card
#[poise::command(slash_command, guild_only)]
pub async fn details(
    ctx: Context<'_>,
    #[description = "Project, platform or country"]
    #[autocomplete = "autocomplete_record"]
    record: String,
) -> Result<(), anyhow::Error> {
    let catalog = ctx.data().catalog.read().await;
    let detail = match record.split_once(':') {
        Some(("project", id)) => catalog.project(id).map(Listing::detail),
        Some(("platform", id)) => catalog.platform(id).map(Listing::detail),
        Some(("country", id)) => catalog.dataset(id).map(Listing::detail),
        _ => None,
    };
    drop(catalog);

    let Some(detail) = detail else {
        bail!("No record matches `{}`", record);
    };
    send_chunked(&ctx, &to_text(&[detail])).await
}

struct Export {
    count: String,
    /// Rendered anchor element, for embedding in a page.
    html: String,
    /// The filtered records behind the fragment.
    json: String,
}

fn export_listing<T: Listing + Serialize>(
    records: Vec<T>,
    filters: ActiveFilters,
    view: ViewMode,
) -> Result<Export, anyhow::Error> {
    let mut doc = Document::new().with_anchor(T::ANCHOR);
    let browser = Browser::mount(&doc, records)
        .context("Export page has no listing anchor")?
        .with_filters(filters)
        .with_view(view);
    browser
        .render(&mut doc)
        .context("Export page has no listing anchor")?;
    let html = doc
        .get(T::ANCHOR)
        .map(|anchor| anchor.to_html())
        .unwrap_or_default();
    let json = serde_json::to_string_pretty(browser.filtered())
        .context("Failed to serialize exported records")?;
    Ok(Export {
        count: browser.result_count(),
        html,
        json,
    })
}

/// Export a filtered listing as an HTML fragment and JSON records
#[poise::command(slash_command, guild_only)]
pub async fn export(
    ctx: Context<'_>,
    #[description = "Which listing"] kind: ListingKind,
    #[description = "Search text"] search: Option<String>,
    #[description = "Category"]
    #[autocomplete = "autocomplete_category"]
    category: Option<String>,
    #[description = "Project status"]
    #[autocomplete = "autocomplete_status"]
    status: Option<String>,
    #[description = "Country"]
    #[autocomplete = "autocomplete_country"]
    country: Option<String>,
    #[description = "Platform provider"]
    #[autocomplete = "autocomplete_provider"]
    provider: Option<String>,
    #[description = "Region"]
    #[autocomplete = "autocomplete_region"]
    region: Option<String>,
    #[description = "Grid cards or list rows"] view: Option<ViewMode>,
) -> Result<(), anyhow::Error> {
    let default_view = ctx.data().browse_config.read().await.default_view;
    let view = view.unwrap_or(default_view);
    let filters = filters_from(
        search.as_deref(),
        &[
            (Facet::Category, category.as_deref()),
            (Facet::Status, status.as_deref()),
            (Facet::Country, country.as_deref()),
            (Facet::Provider, provider.as_deref()),
            (Facet::Region, region.as_deref()),
        ],
    );

    let catalog = ctx.data().catalog.read().await;
    let exported = match kind {
        ListingKind::Projects => export_listing(catalog.projects.clone(), filters, view),
        ListingKind::Platforms => export_listing(catalog.platforms.clone(), filters, view),
        ListingKind::Countries => export_listing(catalog.datasets.clone(), filters, view),
    };
    drop(catalog);
    let export = exported?;

    let stem = format!("agmp-{}", kind.slug());
    info!(
        user = ctx.author().name,
        listing = kind.slug(),
        html_bytes = export.html.len(),
        json_bytes = export.json.len(),
        "Exporting listing"
    );
    ctx.send(
        CreateReply::default()
            .content(export.count)
            .attachment(serenity::CreateAttachment::bytes(
                export.html.into_bytes(),
                format!("{}.html", stem),
            ))
            .attachment(serenity::CreateAttachment::bytes(
                export.json.into_bytes(),
                format!("{}.json", stem),
            )),
    )
    .await?;
    Ok(())
}

/// Facet options across every listing, first label wins per value.
fn catalog_facet_options(catalog: &Catalog, facet: Facet) -> Vec<FacetOption> {
    let mut seen = BTreeSet::new();
    let mut options: Vec<FacetOption> = facet_options(&catalog.projects, facet)
        .into_iter()
        .chain(facet_options(&catalog.platforms, facet))
        .chain(facet_options(&catalog.datasets, facet))
        .filter(|o| seen.insert(o.value.clone()))
        .collect();
    options.sort();
    options
}

async fn export_choices(ctx: Context<'_>, facet: Facet, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let partial = partial.to_lowercase();
    let catalog = ctx.data().catalog.read().await;
    std::iter::once(serenity::AutocompleteChoice::new("All", ALL))
        .chain(
            catalog_facet_options(&catalog, facet)
                .into_iter()
                .filter(|o| o.label.to_lowercase().contains(&partial))
                .map(|o| serenity::AutocompleteChoice::new(o.label, o.value)),
        )
        .take(25)
        .collect()
}

async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    export_choices(ctx, Facet::Category, partial).await
}

async fn autocomplete_status(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    export_choices(ctx, Facet::Status, partial).await
}

async fn autocomplete_country(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    export_choices(ctx, Facet::Country, partial).await
}

async fn autocomplete_provider(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    export_choices(ctx, Facet::Provider, partial).await
}

async fn autocomplete_region(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    export_choices(ctx, Facet::Region, partial).await
}

fn stat_line(label: &str, counts: &BTreeMap<&'static str, usize>) -> String {
    let slices: Vec<String> = counts
        .iter()
        .filter(|(name, _)| **name != TOTAL)
        .map(|(name, n)| format!("{} {}", n, name))
        .collect();
    let total = counts.get(TOTAL).copied().unwrap_or(0);
    if slices.is_empty() {
        format!("**{}:** {}", label, total)
    } else {
        format!("**{}:** {} ({})", label, total, slices.join(", "))
    }
}

fn catalog_summary(catalog: &Catalog) -> String {
    format!(
        "**AGMP Catalog**\n{}\n{}\n**Countries with inventory data:** {}\nLoaded <t:{}:R>",
        stat_line("Projects", &aggregate(&catalog.projects, PROJECT_SLICES)),
        stat_line("Platforms", &aggregate(&catalog.platforms, PLATFORM_SLICES)),
        catalog.datasets.len(),
        catalog.loaded_at
    )
}

/// Catalog counters
#[poise::command(slash_command, guild_only)]
pub async fn stats(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let summary = catalog_summary(&*ctx.data().catalog.read().await);
    ctx.say(summary).await?;
    Ok(())
}

/// Drop cached data and reload the catalog (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn reload(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }
    ctx.defer().await?;

    let loader = &ctx.data().loader;
    loader.clear_cache().await;
    let fresh = Catalog::load(loader).await;
    let summary = catalog_summary(&fresh);
    *ctx.data().catalog.write().await = fresh;

    info!(user = ctx.author().name, "Catalog reloaded");
    ctx.say(format!("Reloaded.\n{}", summary)).await?;
    Ok(())
}

/// `(display name, "kind:id")` for every record whose title contains
/// `partial`, case-insensitively.
fn record_choices<'a, T: Listing>(
    records: &'a [T],
    label: &'a str,
    kind: &'a str,
    partial: &'a str,
) -> impl Iterator<Item = (String, String)> + 'a {
    records
        .iter()
        .filter(move |r| r.title().to_lowercase().contains(partial))
        .map(move |r| (format!("{}: {}", label, r.title()), format!("{}:{}", kind, r.id())))
}

async fn autocomplete_record(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let partial = partial.to_lowercase();
    let catalog = ctx.data().catalog.read().await;
    record_choices(&catalog.projects, "Project", "project", &partial)
        .chain(record_choices(&catalog.platforms, "Platform", "platform", &partial))
        .chain(record_choices(&catalog.datasets, "Country", "country", &partial))
        .take(25)
        .map(|(name, value)| serenity::AutocompleteChoice::new(name, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback::fallback_records;
    use crate::catalog::normalize::normalize_project;
    use crate::catalog::types::{Domain, Project};
    use std::collections::HashMap;

    fn projects() -> Vec<Project> {
        fallback_records(Domain::Projects)
            .iter()
            .map(normalize_project)
            .collect()
    }

    fn catalog() -> Catalog {
        let mut raw = HashMap::new();
        for domain in Domain::ALL {
            raw.insert(domain, fallback_records(domain));
        }
        Catalog::from_raw(&raw)
    }

    #[test]
    fn test_export_wraps_anchor() {
        let export = export_listing(projects(), ActiveFilters::new(), ViewMode::Grid).unwrap();
        assert_eq!(export.count, "5 projects found");
        assert!(export.html.starts_with("<div id=\"project-grid\" class=\"grid-view\">"));
        assert_eq!(export.html.matches("class=\"project-card modern-card\"").count(), 5);
    }

    #[test]
    fn test_export_empty_state() {
        let filters = filters_from(Some("zzzz"), &[]);
        let export = export_listing(projects(), filters, ViewMode::List).unwrap();
        assert_eq!(export.count, "0 projects found");
        assert!(export.html.contains("no-projects-state"));
        assert_eq!(export.json.trim(), "[]");
    }

    #[test]
    fn test_export_applies_facets_to_fragment_and_records() {
        let filters = filters_from(
            None,
            &[(Facet::Category, Some("mining")), (Facet::Status, Some("upcoming"))],
        );
        let export = export_listing(projects(), filters, ViewMode::Grid).unwrap();
        assert_eq!(export.count, "1 project found");
        assert!(export.html.contains("Southern Africa Mining Impact Study"));

        let records: serde_json::Value = serde_json::from_str(&export.json).unwrap();
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "Southern Africa Mining Impact Study");
        assert_eq!(records[0]["category"], "mining");
        assert_eq!(records[0]["status"], "upcoming");
    }

    #[test]
    fn test_export_platform_records_use_tag_slugs() {
        let catalog = catalog();
        let filters = filters_from(None, &[(Facet::Region, Some("continental"))]);
        let export = export_listing(catalog.platforms.clone(), filters, ViewMode::List).unwrap();
        let records: serde_json::Value = serde_json::from_str(&export.json).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 2);
        assert_eq!(records[0]["region"], "continental");
    }

    #[test]
    fn test_catalog_facet_options_merge_listings() {
        let catalog = catalog();
        let categories = catalog_facet_options(&catalog, Facet::Category);
        let values: Vec<&str> = categories.iter().map(|o| o.value.as_str()).collect();
        assert!(values.contains(&"mining"));
        assert!(values.contains(&"geoportal"));
        let distinct: BTreeSet<&str> = values.iter().copied().collect();
        assert_eq!(distinct.len(), values.len());
    }

    #[test]
    fn test_record_choices_use_listing_titles() {
        let catalog = catalog();
        let choices: Vec<(String, String)> =
            record_choices(&catalog.platforms, "Platform", "platform", "geoportal").collect();
        assert_eq!(
            choices,
            vec![("Platform: Africa GeoPortal".to_string(), "platform:africa-geoportal".to_string())]
        );
        let countries: Vec<(String, String)> =
            record_choices(&catalog.datasets, "Country", "country", "nigeria").collect();
        assert_eq!(countries.len(), 1);
        assert!(countries[0].1.starts_with("country:"));
    }

    #[test]
    fn test_catalog_summary() {
        let catalog = catalog();
        let summary = catalog_summary(&catalog);
        assert!(summary.contains("**Projects:** 5 (1 completed, 3 ongoing, 1 upcoming)"));
        assert!(summary.contains("**Platforms:** 3 (2 continental, 1 geoportal, 1 satellite)"));
        assert!(summary.contains("**Countries with inventory data:** 2"));
    }
}
