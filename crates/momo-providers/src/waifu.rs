use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::nekos::decode;

const DEFAULT_BASE_URL: &str = "https://api.waifu.im/images";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum page size the API accepts.
const MAX_COUNT: u32 = 10;

/// waifu.im API client.
pub struct WaifuClient {
    client: reqwest::Client,
    base_url: String,
}

/// Content-rating filter for [`WaifuClient::images`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsfwMode {
    Sfw,
    Nsfw,
    All,
}

impl NsfwMode {
    /// Query-string value understood by the API.
    pub fn as_query(self) -> &'static str {
        match self {
            NsfwMode::Sfw => "False",
            NsfwMode::Nsfw => "True",
            NsfwMode::All => "All",
        }
    }
}

impl std::fmt::Display for NsfwMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaifuImage {
    pub id: i64,
    /// File extension including the leading dot, e.g. ".png".
    #[serde(default)]
    pub extension: String,
    pub url: String,
    #[serde(default)]
    pub is_nsfw: bool,
    #[serde(default)]
    pub is_animated: bool,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub dominant_color: Option<String>,
    #[serde(default)]
    pub favorites: i64,
    #[serde(default)]
    pub artists: Vec<WaifuArtist>,
    #[serde(default)]
    pub tags: Vec<WaifuTag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaifuArtist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaifuTag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaifuResponse {
    items: Vec<WaifuImage>,
}

impl WaifuClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_base_url(user_agent, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(user_agent: &str, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch up to `count` images (clamped to 1..=10).
    pub async fn images(
        &self,
        mode: NsfwMode,
        count: u32,
        animated_only: bool,
    ) -> Result<Vec<WaifuImage>> {
        let count = clamp_count(count);
        let mut url = format!(
            "{}?IsNsfw={}&pageSize={}",
            self.base_url,
            mode.as_query(),
            count
        );
        if animated_only {
            url.push_str("&IsAnimated=True");
        }

        debug!(%mode, count, animated_only, "fetching waifu.im images");
        let resp = self.client.get(&url).send().await?;
        let parsed: WaifuResponse = decode(resp).await?;
        Ok(parsed.items)
    }

    /// Download the image bytes behind a full URL returned by the API.
    pub async fn download(&self, image_url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(image_url).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::Api {
                status: resp.status().as_u16(),
                body: String::new(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

fn clamp_count(count: u32) -> u32 {
    count.clamp(1, MAX_COUNT)
}
