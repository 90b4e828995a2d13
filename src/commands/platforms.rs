use poise::serenity_prelude as serenity;

use super::{facet_choices, filters_from, show_listing};
use crate::browse::Facet;
use crate::render::ViewMode;
use crate::state::Context;

/// Browse geospatial data platforms
#[poise::command(slash_command, guild_only)]
pub async fn platforms(
    ctx: Context<'_>,
    #[description = "Search name, description and provider"] search: Option<String>,
    #[description = "Category"]
    #[autocomplete = "autocomplete_category"]
    category: Option<String>,
    #[description = "Provider"]
    #[autocomplete = "autocomplete_provider"]
    provider: Option<String>,
    #[description = "Coverage region"]
    #[autocomplete = "autocomplete_region"]
    region: Option<String>,
    #[description = "Grid cards or list rows"] view: Option<ViewMode>,
    #[description = "Page number"]
    #[min = 1]
    page: Option<u32>,
) -> Result<(), anyhow::Error> {
    let filters = filters_from(
        search.as_deref(),
        &[
            (Facet::Category, category.as_deref()),
            (Facet::Provider, provider.as_deref()),
            (Facet::Region, region.as_deref()),
        ],
    );
    let records = ctx.data().catalog.read().await.platforms.clone();
    show_listing(ctx, records, filters, view, page).await
}

async fn choices(ctx: Context<'_>, facet: Facet, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let catalog = ctx.data().catalog.read().await;
    facet_choices(&catalog.platforms, facet, partial)
}

async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(ctx, Facet::Category, partial).await
}

async fn autocomplete_provider(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(ctx, Facet::Provider, partial).await
}

async fn autocomplete_region(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(ctx, Facet::Region, partial).await
}
