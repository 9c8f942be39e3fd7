//! Global slash commands: `/catgirl`, `/waifu`, `/webhook`, `/forcewebhook`,
//! `/help`.
//!
//! Registration happens in `ready()` when `config.slash_commands` is true.
//! Interactions are dispatched from `interaction_create` in the event handler.

use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::prelude::Context;
use tracing::{info, warn};

use momo_scheduler::SchedulerError;

use crate::context::BotContext;
use crate::error::DiscordError;
use crate::{fetch, send};

/// Register global slash commands. Call from `ready()`.
pub async fn register_commands(ctx: &Context) {
    let picture_options = || {
        vec![
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "count",
                "How many pictures (1-10)",
            )
            .min_int_value(1)
            .max_int_value(10)
            .required(false),
            CreateCommandOption::new(CommandOptionType::Boolean, "nsfw", "Include NSFW results")
                .required(false),
        ]
    };

    let mut catgirl = CreateCommand::new("catgirl").description("Catgirl pictures from nekos.moe");
    for option in picture_options() {
        catgirl = catgirl.add_option(option);
    }
    let mut waifu = CreateCommand::new("waifu").description("Waifu pictures from waifu.im");
    for option in picture_options() {
        waifu = waifu.add_option(option);
    }
    waifu = waifu.add_option(
        CreateCommandOption::new(CommandOptionType::Boolean, "gif", "Animated pictures only")
            .required(false),
    );

    let commands = vec![
        catgirl,
        waifu,
        CreateCommand::new("webhook").description("Toggle the daily webhook delivery"),
        CreateCommand::new("forcewebhook").description("Send the daily delivery right now"),
        CreateCommand::new("help").description("Show available commands"),
    ];

    match serenity::model::application::Command::set_global_commands(&ctx.http, commands).await {
        Ok(cmds) => info!(count = cmds.len(), "registered global slash commands"),
        Err(e) => warn!(error = %e, "failed to register global slash commands"),
    }
}

/// Dispatch a slash command interaction to the appropriate handler.
pub async fn handle_interaction(app: &BotContext, ctx: &Context, command: &CommandInteraction) {
    let result = match command.data.name.as_str() {
        "catgirl" => handle_pictures(app, ctx, command, Provider::Catgirl).await,
        "waifu" => handle_pictures(app, ctx, command, Provider::Waifu).await,
        "webhook" => handle_webhook(app, ctx, command).await,
        "forcewebhook" => handle_forcewebhook(app, ctx, command).await,
        "help" => handle_help(ctx, command).await,
        _ => {
            respond_ephemeral(ctx, command, "Unknown command.").await;
            Ok(())
        }
    };

    if let Err(e) = result {
        warn!(command = %command.data.name, error = %e, "slash command error");
    }
}

enum Provider {
    Catgirl,
    Waifu,
}

/// `/catgirl [count] [nsfw]` and `/waifu [count] [nsfw]`.
async fn handle_pictures(
    app: &BotContext,
    ctx: &Context,
    command: &CommandInteraction,
    provider: Provider,
) -> Result<(), DiscordError> {
    let count = command
        .data
        .options
        .iter()
        .find(|o| o.name == "count")
        .and_then(|o| o.value.as_i64())
        .unwrap_or(1)
        .clamp(1, 10) as u32;
    let nsfw = command
        .data
        .options
        .iter()
        .find(|o| o.name == "nsfw")
        .and_then(|o| o.value.as_bool())
        .unwrap_or(false);
    let animated_only = command
        .data
        .options
        .iter()
        .find(|o| o.name == "gif")
        .and_then(|o| o.value.as_bool())
        .unwrap_or(false);

    // Defer the response; fetching and downloading can take a few seconds.
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    let fetched = match provider {
        Provider::Catgirl => fetch::fetch_catgirls(app, count, nsfw).await,
        Provider::Waifu => fetch::fetch_waifus(app, count, nsfw, animated_only).await,
    };

    let deliveries = match fetched {
        Ok(deliveries) => deliveries,
        Err(e) => {
            warn!(error = %e, "picture fetch failed");
            command
                .create_followup(
                    &ctx.http,
                    CreateInteractionResponseFollowup::new()
                        .content("\u{1f63f} Couldn't fetch any pictures, try again later."),
                )
                .await?;
            return Ok(());
        }
    };

    let (files, links) = send::build_attachments(deliveries);
    let mut followup = CreateInteractionResponseFollowup::new().add_files(files);
    if let Some(content) = send::fallback_content(&links) {
        followup = followup.content(content);
    }
    command.create_followup(&ctx.http, followup).await?;
    Ok(())
}

/// `/webhook`: flip the daily delivery toggle and persist it.
async fn handle_webhook(
    app: &BotContext,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), DiscordError> {
    let enabled = app.settings.toggle_daily()?;
    app.webhook.set_enabled(enabled);

    let (_, url) = app.webhook.status();
    let text =
        send::webhook_status_text(enabled, &url, app.scheduler.trigger(), app.webhook.last_sent());
    respond(ctx, command, &text).await;
    Ok(())
}

/// `/forcewebhook`: fire an out-of-band delivery cycle.
async fn handle_forcewebhook(
    app: &BotContext,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), DiscordError> {
    match app.scheduler.force_send() {
        Ok(()) => {
            respond(ctx, command, "\u{1f4e4} Daily delivery triggered.").await;
        }
        Err(SchedulerError::Disabled) => {
            respond_ephemeral(
                ctx,
                command,
                "The daily webhook is disabled or has no URL configured. \
                 Use `/webhook` to enable it.",
            )
            .await;
        }
        Err(e) => {
            warn!(error = %e, "force delivery failed");
            respond_ephemeral(ctx, command, "Couldn't trigger the delivery.").await;
        }
    }
    Ok(())
}

async fn handle_help(ctx: &Context, command: &CommandInteraction) -> Result<(), DiscordError> {
    respond_ephemeral(ctx, command, &send::help_text()).await;
    Ok(())
}

async fn respond(ctx: &Context, command: &CommandInteraction, content: &str) {
    let _ = command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(content),
            ),
        )
        .await;
}

/// Send an ephemeral response (only visible to the invoker).
async fn respond_ephemeral(ctx: &Context, command: &CommandInteraction, content: &str) {
    let _ = command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await;
}
