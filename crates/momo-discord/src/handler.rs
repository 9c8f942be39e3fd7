use std::sync::Arc;

use serenity::all::ActivityData;
use serenity::async_trait;
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::{Context, EventHandler};
use tracing::info;

use momo_core::config::DiscordConfig;

use crate::context::BotContext;

/// Serenity event handler wired to the bot context.
pub struct MomoHandler {
    pub ctx: Arc<BotContext>,
    pub config: DiscordConfig,
}

#[async_trait]
impl EventHandler for MomoHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        ctx.set_activity(Some(ActivityData::listening(&self.config.activity)));
        info!(name = %ready.user.name, "Discord bot connected");

        if self.config.slash_commands {
            crate::commands::register_commands(&ctx).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || !self.config.prefix_commands {
            return;
        }

        let Some(rest) = msg.content.strip_prefix('!') else {
            return;
        };
        crate::prefix::dispatch(&self.ctx, &ctx, &msg, rest).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if !self.config.slash_commands {
            return;
        }
        if let Interaction::Command(command) = interaction {
            crate::commands::handle_interaction(&self.ctx, &ctx, &command).await;
        }
    }
}
