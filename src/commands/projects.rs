use poise::serenity_prelude as serenity;

use super::{facet_choices, filters_from, show_listing};
use crate::browse::Facet;
use crate::render::ViewMode;
use crate::state::Context;

/// Browse geoscience projects
#[poise::command(slash_command, guild_only)]
pub async fn projects(
    ctx: Context<'_>,
    #[description = "Search title, description and organization"] search: Option<String>,
    #[description = "Category"]
    #[autocomplete = "autocomplete_category"]
    category: Option<String>,
    #[description = "Status"]
    #[autocomplete = "autocomplete_status"]
    status: Option<String>,
    #[description = "Country"]
    #[autocomplete = "autocomplete_country"]
    country: Option<String>,
    #[description = "Grid cards or list rows"] view: Option<ViewMode>,
    #[description = "Page number"]
    #[min = 1]
    page: Option<u32>,
) -> Result<(), anyhow::Error> {
    let filters = filters_from(
        search.as_deref(),
        &[
            (Facet::Category, category.as_deref()),
            (Facet::Status, status.as_deref()),
            (Facet::Country, country.as_deref()),
        ],
    );
    let records = ctx.data().catalog.read().await.projects.clone();
    show_listing(ctx, records, filters, view, page).await
}

async fn choices(ctx: Context<'_>, facet: Facet, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let catalog = ctx.data().catalog.read().await;
    facet_choices(&catalog.projects, facet, partial)
}

async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(ctx, Facet::Category, partial).await
}

async fn autocomplete_status(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(ctx, Facet::Status, partial).await
}

async fn autocomplete_country(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(ctx, Facet::Country, partial).await
}
