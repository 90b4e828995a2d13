mod browse;
mod catalog;
mod commands;
mod render;
mod state;

use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{error, info, Level};

use catalog::loader::DataLoader;
use catalog::Catalog;
use state::{parse_admin_ids, AppState, BrowseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let token = dotenv::var("DISCORD_TOKEN").expect("DISCORD_TOKEN required");
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Load catalog; failed sources fall back, so this always yields records
    let loader = Arc::new(DataLoader::from_env()?);
    let catalog = Arc::new(RwLock::new(Catalog::load(&loader).await));

    let admin_ids = parse_admin_ids(&dotenv::var("ADMIN_USER_IDS").unwrap_or_default());
    let config = BrowseConfig::from_env();
    info!(
        admins = admin_ids.len(),
        page_size = config.page_size,
        default_view = config.default_view.as_str(),
        "Browse settings loaded"
    );
    let browse_config = Arc::new(RwLock::new(config));

    let app_state = AppState {
        catalog,
        loader,
        admin_ids,
        browse_config,
    };

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::agmp()],
            on_error: |err| Box::pin(commands::on_error(err)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, id = %ready.user.id, "Connected to gateway");
                register_commands(ctx, &framework.options().commands, guild_id).await?;
                Ok(app_state)
            })
        })
        .build();

    info!(guild = ?guild_id, "Starting AGMP catalog bot");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .context("Failed to create Discord client")?;

    if let Err(e) = client.start().await {
        error!(error = %e, "Discord client stopped");
    }

    Ok(())
}

/// Register the `/agmp` tree in one guild when `guild_id` is set, which
/// takes effect immediately, otherwise globally.
async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<AppState, anyhow::Error>],
    guild_id: Option<serenity::GuildId>,
) -> Result<(), anyhow::Error> {
    let subcommands: Vec<&str> = commands
        .iter()
        .flat_map(|cmd| cmd.subcommands.iter().map(|sub| sub.name.as_str()))
        .collect();
    match guild_id {
        Some(gid) => {
            poise::builtins::register_in_guild(ctx, commands, gid).await?;
            info!(guild = %gid, ?subcommands, "Commands registered in guild");
        }
        None => {
            poise::builtins::register_globally(ctx, commands).await?;
            info!(?subcommands, "Commands registered globally, propagation can take an hour");
        }
    }
    Ok(())
}
