//! Discord webhook payload shapes and the daily-bundle builder.

use serde::Serialize;

/// Embed accent for the waifu picture (purple).
pub const WAIFU_COLOR: u32 = 0x9B59B6;
/// Embed accent for the catgirl picture (pink).
pub const CATGIRL_COLOR: u32 = 0xE91E63;

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

/// Build the daily bundle payload from the fetched image URLs.
///
/// Bare URLs are repeated in the content as a fallback in case the embeds
/// fail to render.
pub fn daily_payload(waifu_url: Option<&str>, catgirl_url: Option<&str>) -> WebhookPayload {
    let mut content = String::from(
        "## \u{1f338} Your daily waifu/catgirl delivery \u{1f338}\n\
         *Starting your day with some kawaii energy!*",
    );
    let mut embeds = Vec::new();

    if let Some(url) = waifu_url {
        content.push_str(&format!("\n**\u{1f49c} Daily Waifu:** {url}"));
        embeds.push(Embed {
            title: Some("\u{1f49c} Daily Waifu".to_string()),
            description: Some("Here's your beautiful waifu for today!".to_string()),
            image: Some(EmbedImage {
                url: url.to_string(),
            }),
            color: Some(WAIFU_COLOR),
        });
    }

    if let Some(url) = catgirl_url {
        content.push_str(&format!("\n**\u{1f431} Daily Catgirl:** {url}"));
        embeds.push(Embed {
            title: Some("\u{1f431} Daily Catgirl".to_string()),
            description: Some("And here's your adorable catgirl!".to_string()),
            image: Some(EmbedImage {
                url: url.to_string(),
            }),
            color: Some(CATGIRL_COLOR),
        });
    }

    WebhookPayload { content, embeds }
}

/// Loose shape check for a Discord webhook URL:
/// `https://discord(app).com/api/webhooks/{numeric id}/{token}`.
pub fn is_discord_webhook_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://discord.com/api/webhooks/")
        .or_else(|| url.strip_prefix("https://discordapp.com/api/webhooks/"));
    let Some(rest) = rest else {
        return false;
    };

    let Some((id, token)) = rest.split_once('/') else {
        return false;
    };

    !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
