//! Legacy `!`-prefixed message commands.

use serenity::builder::CreateMessage;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use tracing::warn;

use crate::args::parse_image_args;
use crate::context::BotContext;
use crate::error::DiscordError;
use crate::{fetch, send};

/// Dispatch a message whose content started with `!`. Unknown commands are
/// ignored so the bot stays quiet in channels using other `!`-prefix bots.
pub async fn dispatch(app: &BotContext, ctx: &Context, msg: &Message, rest: &str) {
    let mut parts = rest.split_whitespace();
    let Some(name) = parts.next() else {
        return;
    };
    let tokens: Vec<&str> = parts.collect();

    let result = match name.to_lowercase().as_str() {
        "catgirl" => catgirl(app, ctx, msg, &tokens).await,
        "waifu" => waifu(app, ctx, msg, &tokens).await,
        "webhook" => webhook(app, ctx, msg).await,
        "help" => help(ctx, msg).await,
        _ => return,
    };

    if let Err(e) = result {
        warn!(command = name, error = %e, "prefix command failed");
        let _ = msg
            .channel_id
            .say(&ctx.http, "\u{1f63f} Something went wrong, try again later.")
            .await;
    }
}

async fn catgirl(
    app: &BotContext,
    ctx: &Context,
    msg: &Message,
    tokens: &[&str],
) -> Result<(), DiscordError> {
    let args = parse_image_args(tokens);
    let _ = msg.channel_id.broadcast_typing(&ctx.http).await;

    let deliveries = fetch::fetch_catgirls(app, args.count, args.nsfw).await?;
    reply_with_images(ctx, msg, deliveries).await
}

async fn waifu(
    app: &BotContext,
    ctx: &Context,
    msg: &Message,
    tokens: &[&str],
) -> Result<(), DiscordError> {
    let args = parse_image_args(tokens);
    let _ = msg.channel_id.broadcast_typing(&ctx.http).await;

    let deliveries = fetch::fetch_waifus(app, args.count, args.nsfw, false).await?;
    reply_with_images(ctx, msg, deliveries).await
}

async fn reply_with_images(
    ctx: &Context,
    msg: &Message,
    deliveries: Vec<fetch::ImageDelivery>,
) -> Result<(), DiscordError> {
    let (files, links) = send::build_attachments(deliveries);

    let mut builder = CreateMessage::new().add_files(files);
    if let Some(content) = send::fallback_content(&links) {
        builder = builder.content(content);
    }
    msg.channel_id.send_message(&ctx.http, builder).await?;

    // Tidy up the invoking command; needs Manage Messages in guilds.
    let _ = msg.delete(&ctx.http).await;
    Ok(())
}

async fn webhook(app: &BotContext, ctx: &Context, msg: &Message) -> Result<(), DiscordError> {
    let enabled = app.settings.toggle_daily()?;
    app.webhook.set_enabled(enabled);

    let (_, url) = app.webhook.status();
    let text =
        send::webhook_status_text(enabled, &url, app.scheduler.trigger(), app.webhook.last_sent());
    msg.channel_id.say(&ctx.http, text).await?;
    Ok(())
}

async fn help(ctx: &Context, msg: &Message) -> Result<(), DiscordError> {
    msg.channel_id.say(&ctx.http, send::help_text()).await?;
    Ok(())
}
