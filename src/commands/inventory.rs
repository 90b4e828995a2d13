use anyhow::{bail, Context as _};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use tracing::info;

use super::{clip, facet_choices, filters_from, send_chunked, show_listing, to_text, MESSAGE_LIMIT};
use crate::browse::{Facet, Listing};
use crate::catalog::inventory::{analyze_field, choropleth, doughnut_chart, field_label, FIELD_GROUPS};
use crate::catalog::{slugify, BOUNDARIES_PATH};
use crate::render::inventory::field_summary;
use crate::render::ViewMode;
use crate::state::Context;

fn known_field(field: &str) -> bool {
    FIELD_GROUPS
        .iter()
        .flat_map(|g| g.fields.iter())
        .any(|(key, _)| *key == field)
}

/// Data availability of one field across countries
#[poise::command(slash_command, guild_only)]
pub async fn field(
    ctx: Context<'_>,
    #[description = "Survey field"]
    #[autocomplete = "autocomplete_field"]
    field: String,
) -> Result<(), anyhow::Error> {
    if !known_field(&field) {
        bail!("Unknown field `{}`", field);
    }

    let analysis = analyze_field(&ctx.data().catalog.read().await.datasets, &field);
    info!(field, counts = ?analysis.counts(), "Field analysed");

    let text = to_text(&[field_summary(&field, &analysis)]);
    let chart = serde_json::to_vec_pretty(&doughnut_chart(&analysis))
        .context("Failed to serialize chart config")?;
    ctx.send(
        CreateReply::default()
            .content(clip(&text, MESSAGE_LIMIT))
            .attachment(serenity::CreateAttachment::bytes(
                chart,
                format!("{}-chart.json", slugify(&field)),
            )),
    )
    .await?;
    Ok(())
}

/// Inventory of one country, or the list of countries
#[poise::command(slash_command, guild_only)]
pub async fn country(
    ctx: Context<'_>,
    #[description = "Country to analyse"]
    #[autocomplete = "autocomplete_country"]
    name: Option<String>,
    #[description = "Search country and region"] search: Option<String>,
    #[description = "Region"]
    #[autocomplete = "autocomplete_region"]
    region: Option<String>,
    #[description = "Grid cards or list rows"] view: Option<ViewMode>,
    #[description = "Page number"]
    #[min = 1]
    page: Option<u32>,
) -> Result<(), anyhow::Error> {
    let catalog = ctx.data().catalog.read().await;

    if let Some(name) = name {
        let Some(dataset) = catalog.dataset(&name) else {
            bail!("No inventory data for {}", name);
        };
        let text = to_text(&[dataset.detail()]);
        drop(catalog);
        return send_chunked(&ctx, &text).await;
    }

    let records = catalog.datasets.clone();
    drop(catalog);
    let filters = filters_from(search.as_deref(), &[(Facet::Region, region.as_deref())]);
    show_listing(ctx, records, filters, view, page).await
}

/// Choropleth GeoJSON for one field
#[poise::command(slash_command, guild_only)]
pub async fn map(
    ctx: Context<'_>,
    #[description = "Survey field"]
    #[autocomplete = "autocomplete_field"]
    field: String,
) -> Result<(), anyhow::Error> {
    if !known_field(&field) {
        bail!("Unknown field `{}`", field);
    }
    ctx.defer().await?;

    let Some(boundaries) = ctx.data().loader.load_geojson(BOUNDARIES_PATH).await else {
        bail!("Country boundaries are unavailable right now");
    };

    let catalog = ctx.data().catalog.read().await;
    let styled = choropleth(&boundaries, &catalog.datasets, &field);
    let [available, limited, none] = analyze_field(&catalog.datasets, &field).counts();
    drop(catalog);

    let body = serde_json::to_vec(&styled).context("Failed to serialize GeoJSON")?;
    ctx.send(
        CreateReply::default()
            .content(format!(
                "**{}**: {} available, {} limited, {} not available",
                field_label(&field),
                available,
                limited,
                none
            ))
            .attachment(serenity::CreateAttachment::bytes(
                body,
                format!("{}.geojson", slugify(&field)),
            )),
    )
    .await?;
    Ok(())
}

async fn autocomplete_field(_ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let partial = partial.to_lowercase();
    FIELD_GROUPS
        .iter()
        .flat_map(|g| g.fields.iter().map(move |(key, label)| (g, *key, *label)))
        .filter(|(group, _, label)| {
            label.to_lowercase().contains(&partial)
                || group.label.to_lowercase().contains(&partial)
                || group.key.starts_with(&partial)
        })
        .map(|(group, key, label)| {
            serenity::AutocompleteChoice::new(format!("{} / {}", group.label, label), key)
        })
        .take(25)
        .collect()
}

async fn autocomplete_country(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let catalog = ctx.data().catalog.read().await;
    facet_choices(&catalog.datasets, Facet::Country, partial)
        .into_iter()
        .skip(1)
        .collect()
}

async fn autocomplete_region(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let catalog = ctx.data().catalog.read().await;
    facet_choices(&catalog.datasets, Facet::Region, partial)
}
