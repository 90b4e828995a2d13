use crate::render::ViewMode;
use crate::state::Context;

/// Configure browse settings (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "page_size | default_view"] param: Option<String>,
    #[description = "New value"] value: Option<String>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value.as_deref()) {
        // Show current config
        (None, _) => {
            let config = ctx.data().browse_config.read().await;
            ctx.say(format!(
                "**Browse Configuration:**\n\
                 `page_size`: {}\n\
                 `default_view`: {}",
                config.page_size,
                config.default_view.as_str()
            ))
            .await?;
        }
        // Set a parameter
        (Some(key), Some(val)) => {
            let mut config = ctx.data().browse_config.write().await;
            match key {
                "page_size" => match val.trim().parse::<usize>() {
                    Ok(n) if n > 0 => {
                        config.page_size = n;
                        ctx.say(format!("`page_size` set to {}", n)).await?;
                    }
                    _ => {
                        ctx.say("`page_size` must be a positive number").await?;
                    }
                },
                "default_view" => match ViewMode::parse(val) {
                    Some(view) => {
                        config.default_view = view;
                        ctx.say(format!("`default_view` set to {}", view.as_str()))
                            .await?;
                    }
                    None => {
                        ctx.say("`default_view` must be `grid` or `list`").await?;
                    }
                },
                _ => {
                    ctx.say(format!(
                        "Unknown param `{}`. Valid: `page_size`, `default_view`",
                        key
                    ))
                    .await?;
                }
            }
        }
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/agmp config page_size 10`")
                .await?;
        }
    }

    Ok(())
}
