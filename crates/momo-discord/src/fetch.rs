//! Fetch-and-download helpers shared by the prefix and slash commands.

use momo_providers::{NsfwMode, ProviderError};
use tracing::warn;

use crate::context::BotContext;

/// One picture ready for delivery: uploaded as an attachment when the bytes
/// could be downloaded, linked by URL otherwise.
pub struct ImageDelivery {
    pub filename: String,
    pub source_url: String,
    pub bytes: Option<Vec<u8>>,
}

/// Fetch `count` catgirl pictures from nekos.moe and download each one.
///
/// A failed download is not fatal; the picture falls back to its URL.
pub async fn fetch_catgirls(
    app: &BotContext,
    count: u32,
    nsfw: bool,
) -> Result<Vec<ImageDelivery>, ProviderError> {
    let images = app.nekos.random_images(count, Some(nsfw)).await?;
    if images.is_empty() {
        return Err(ProviderError::Empty);
    }

    let mut deliveries = Vec::with_capacity(images.len());
    for img in &images {
        let bytes = match app.nekos.download(&img.id).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(id = %img.id, error = %e, "catgirl download failed, falling back to URL");
                None
            }
        };
        deliveries.push(ImageDelivery {
            filename: format!("{}.jpg", img.id),
            source_url: app.nekos.image_url(&img.id),
            bytes,
        });
    }
    Ok(deliveries)
}

/// Fetch `count` waifu pictures from waifu.im and download each one.
pub async fn fetch_waifus(
    app: &BotContext,
    count: u32,
    nsfw: bool,
    animated_only: bool,
) -> Result<Vec<ImageDelivery>, ProviderError> {
    let mode = if nsfw { NsfwMode::Nsfw } else { NsfwMode::Sfw };
    let images = app.waifu.images(mode, count, animated_only).await?;
    if images.is_empty() {
        return Err(ProviderError::Empty);
    }

    let mut deliveries = Vec::with_capacity(images.len());
    for img in &images {
        let bytes = match app.waifu.download(&img.url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(id = img.id, error = %e, "waifu download failed, falling back to URL");
                None
            }
        };
        let extension = if img.extension.is_empty() {
            ".jpg"
        } else {
            &img.extension
        };
        deliveries.push(ImageDelivery {
            filename: format!("waifu_{}{}", img.id, extension),
            source_url: img.url.clone(),
            bytes,
        });
    }
    Ok(deliveries)
}
