mod config;
mod inventory;
mod manage;
mod platforms;
mod projects;

use std::time::Duration;

use poise::serenity_prelude as serenity;
use poise::CreateReply;
use tracing::{error, info, warn};

use crate::browse::controller::Browser;
use crate::browse::stats::TOTAL;
use crate::browse::{facet_options, ActiveFilters, Facet, Filterable, Listing, ALL};
use crate::render::{self, Node, ViewMode, NOTICE_TTL};
use crate::state::{AppState, Context};

/// Discord's message cap, minus headroom.
const MESSAGE_LIMIT: usize = 1990;
/// Text width for HTML-to-chat conversion.
const TEXT_WIDTH: usize = 100;
/// How long the empty state's button stays live.
const CLEAR_BUTTON_TIMEOUT: Duration = Duration::from_secs(120);

/// AGMP - African geoscience catalog
#[poise::command(
    slash_command,
    subcommands(
        "projects::projects",
        "platforms::platforms",
        "inventory::field",
        "inventory::country",
        "inventory::map",
        "manage::details",
        "manage::export",
        "manage::stats",
        "manage::reload",
        "config::config"
    )
)]
pub async fn agmp(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Post command failures as a notice that removes itself.
pub async fn on_error(err: poise::FrameworkError<'_, AppState, anyhow::Error>) {
    match err {
        poise::FrameworkError::Command { error, ctx, .. } => {
            warn!(
                command = ctx.command().qualified_name,
                error = %format!("{:#}", error),
                "Command failed"
            );
            let text = to_text(&[render::notice(&error.to_string())]);
            match ctx.say(clip(&text, MESSAGE_LIMIT)).await {
                Ok(handle) => {
                    tokio::time::sleep(NOTICE_TTL).await;
                    if let Err(e) = handle.delete(ctx).await {
                        warn!(error = %e, "Failed to remove error notice");
                    }
                }
                Err(e) => error!(error = %e, "Failed to post error notice"),
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(error = %e, "Error while handling error");
            }
        }
    }
}

/// Render nodes to HTML and convert that to plain chat text.
pub fn to_text(nodes: &[Node]) -> String {
    let html = render::to_html(nodes);
    html2text::from_read(html.as_bytes(), TEXT_WIDTH)
        .unwrap_or_else(|_| nodes.iter().map(Node::text_content).collect())
}

/// Longest prefix of `text` within `max` bytes, cut on a char boundary.
fn clip(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Send a message in Discord-safe chunks, preferring line breaks.
/// Uses ctx.say() for all chunks so follow-ups go through the interaction
/// webhook, which doesn't require Send Messages channel permission.
pub async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    let mut remaining = text;
    while !remaining.is_empty() {
        let head = clip(remaining, MESSAGE_LIMIT);
        let split_at = if head.len() < remaining.len() {
            head.rfind('\n')
                .or_else(|| head.rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(head.len())
        } else {
            head.len()
        };
        let chunk = &remaining[..split_at];
        remaining = &remaining[split_at..];

        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Filters from optional command arguments; `None` leaves a dimension open.
pub fn filters_from(search: Option<&str>, facets: &[(Facet, Option<&str>)]) -> ActiveFilters {
    let search = search.map(|query| ("search", query));
    let selected = facets
        .iter()
        .filter_map(|(facet, value)| Some((facet.name(), (*value)?)));
    ActiveFilters::from_pairs(search.into_iter().chain(selected))
}

/// Autocomplete choices for a facet: `all` first, then every option whose
/// label contains `partial`.
pub fn facet_choices<T: Filterable>(
    records: &[T],
    facet: Facet,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let partial = partial.to_lowercase();
    std::iter::once(serenity::AutocompleteChoice::new("All", ALL))
        .chain(
            facet_options(records, facet)
                .into_iter()
                .filter(|o| o.label.to_lowercase().contains(&partial))
                .map(|o| serenity::AutocompleteChoice::new(o.label, o.value)),
        )
        .take(25)
        .collect()
}

fn page_text<T: Listing>(browser: &Browser<T>, page: usize, page_size: usize) -> String {
    let items = browser.items();
    let pages = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, pages);
    let shown: Vec<Node> = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    let mut header = format!("**{}**", browser.result_count());
    if browser.filters().is_active() {
        let total = browser.stats().get(TOTAL).copied().unwrap_or(0);
        header.push_str(&format!(
            " of {} ({})",
            total,
            browser.filters().describe().join(", ")
        ));
    }
    let breakdown: Vec<String> = browser
        .filtered_stats()
        .into_iter()
        .filter(|(name, count)| *name != TOTAL && *count > 0)
        .map(|(name, count)| format!("{} {}", count, name))
        .collect();
    if !breakdown.is_empty() {
        header.push_str(&format!("\n{}", breakdown.join(" | ")));
    }
    if !browser.filtered().is_empty() {
        header.push_str(&format!(
            " | page {}/{} | {} view",
            page,
            pages,
            browser.view().as_str()
        ));
    }
    format!("{}\n\n{}", header, to_text(&shown))
}

/// Reply with one page of a filtered listing. An empty result offers a
/// "Clear Filters" button that re-renders the unfiltered first page.
pub async fn show_listing<T: Listing + Send + Sync>(
    ctx: Context<'_>,
    records: Vec<T>,
    filters: ActiveFilters,
    view: Option<ViewMode>,
    page: Option<u32>,
) -> Result<(), anyhow::Error> {
    let config = ctx.data().browse_config.read().await;
    let page_size = config.page_size;
    let view = view.unwrap_or(config.default_view);
    drop(config);

    let mut browser = Browser::new(records).with_filters(filters);
    browser.set_view(view);
    info!(
        user = ctx.author().name,
        listing = T::PLURAL,
        search = browser.filters().search(),
        shown = browser.filtered().len(),
        "Listing requested"
    );

    if !browser.filtered().is_empty() {
        let text = page_text(&browser, page.unwrap_or(1) as usize, page_size);
        return send_chunked(&ctx, &text).await;
    }

    let custom_id = format!("{}-{}", ctx.id(), render::CLEAR_FILTERS_ACTION);
    let text = page_text(&browser, 1, page_size);
    let reply = CreateReply::default()
        .content(clip(&text, MESSAGE_LIMIT))
        .components(vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(custom_id.clone())
                .label("Clear Filters")
                .style(serenity::ButtonStyle::Primary),
        ])]);
    ctx.send(reply).await?;

    let press = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
        .filter(move |press| press.data.custom_id == custom_id)
        .timeout(CLEAR_BUTTON_TIMEOUT)
        .await;
    if let Some(press) = press {
        browser.clear_filters();
        let text = page_text(&browser, 1, page_size);
        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .content(clip(&text, MESSAGE_LIMIT))
                        .components(vec![]),
                ),
            )
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip("hello", 10), "hello");
        assert_eq!(clip("hello", 3), "hel");
        // "é" is two bytes; cutting inside it backs off.
        assert_eq!(clip("aé", 2), "a");
    }

    #[test]
    fn test_filters_from_arguments() {
        let filters = filters_from(
            Some(" Kenya "),
            &[(Facet::Category, Some("mining")), (Facet::Status, None)],
        );
        assert_eq!(filters.search(), "kenya");
        assert_eq!(filters.selected(Facet::Category), Some("mining"));
        assert_eq!(filters.selected(Facet::Status), None);

        let open = filters_from(None, &[(Facet::Category, Some("all"))]);
        assert!(!open.is_active());
    }

    #[test]
    fn test_page_text_header_describes_filters() {
        use crate::catalog::fallback::fallback_records;
        use crate::catalog::normalize::normalize_project;
        use crate::catalog::types::Domain;

        let projects: Vec<_> = fallback_records(Domain::Projects)
            .iter()
            .map(normalize_project)
            .collect();
        let filters = filters_from(None, &[(Facet::Status, Some("ongoing"))]);
        let browser = Browser::new(projects).with_filters(filters);
        let text = page_text(&browser, 1, 6);
        assert!(text.starts_with("**3 projects found** of 5 (status=ongoing)"));
        assert!(text.contains("3 ongoing"));
        assert!(!text.contains("0 upcoming"));
    }

    #[test]
    fn test_to_text_strips_markup() {
        let text = to_text(&[render::empty_state("platforms")]);
        assert!(text.contains("No Platforms Found"));
        assert!(!text.contains("<h3>"));
    }
}
