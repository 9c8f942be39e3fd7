//! Message-building helpers shared by the prefix and slash command paths.

use chrono::{DateTime, Utc};
use momo_scheduler::Trigger;
use serenity::builder::CreateAttachment;

use crate::fetch::ImageDelivery;

/// Split deliveries into uploadable attachments and URL fallbacks.
pub fn build_attachments(deliveries: Vec<ImageDelivery>) -> (Vec<CreateAttachment>, Vec<String>) {
    let mut files = Vec::new();
    let mut links = Vec::new();

    for delivery in deliveries {
        match delivery.bytes {
            Some(bytes) => files.push(CreateAttachment::bytes(bytes, delivery.filename)),
            None => links.push(delivery.source_url),
        }
    }

    (files, links)
}

/// Content listing the pictures that could not be uploaded, if any.
pub fn fallback_content(links: &[String]) -> Option<String> {
    if links.is_empty() {
        return None;
    }
    Some(links.join("\n"))
}

/// Status reply shown after `!webhook` / `/webhook`: new toggle state,
/// delivery schedule, and the destination URL.
pub fn webhook_status_text(
    enabled: bool,
    url: &str,
    trigger: Trigger,
    last_sent: Option<DateTime<Utc>>,
) -> String {
    let mut text = if enabled {
        "\u{1f7e2} Daily webhook delivery is now **enabled**.".to_string()
    } else {
        "\u{1f534} Daily webhook delivery is now **disabled**.".to_string()
    };

    text.push_str(&format!(
        "\n\u{1f4c5} **Schedule**: every day at {:02}:{:02} (local time)",
        trigger.hour, trigger.minute
    ));

    if url.is_empty() {
        text.push_str("\n\u{26a0}\u{fe0f} No webhook URL is configured, so nothing will be sent.");
    } else {
        text.push_str(&format!("\n\u{1f517} **Webhook URL**: `{url}`"));
    }

    if let Some(when) = last_sent {
        text.push_str(&format!(
            "\nLast delivery: {}",
            when.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    text
}

/// Help text for `!help` / `/help`.
pub fn help_text() -> String {
    "**Momo commands**\n\
     `!catgirl [count] [y/n]` - catgirl pictures from nekos.moe\n\
     `!waifu [count] [y/n]` - waifu pictures from waifu.im\n\
     `!webhook` - toggle the daily webhook delivery\n\
     `!help` - this message\n\
     \n\
     Slash commands: `/catgirl`, `/waifu`, `/webhook`, `/forcewebhook`, `/help`.\n\
     `count` is 1-10 (default 1); `y` includes NSFW results (default off)."
        .to_string()
}
