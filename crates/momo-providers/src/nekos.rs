use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, Result};

const DEFAULT_BASE_URL: &str = "https://nekos.moe/api/v1";
const IMAGE_BASE_URL: &str = "https://nekos.moe/image";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// nekos.moe API client.
pub struct NekosClient {
    client: reqwest::Client,
    base_url: String,
    image_base_url: String,
}

/// One image record from the API. The API returns only IDs; the displayable
/// URL is constructed with [`NekosClient::image_url`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NekosImage {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub favorites: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    images: Vec<NekosImage>,
}

impl NekosClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_base_url(user_agent, DEFAULT_BASE_URL, IMAGE_BASE_URL)
    }

    /// Construct against alternate endpoints (tests use a mock server).
    pub fn with_base_url(
        user_agent: &str,
        base_url: impl Into<String>,
        image_base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            image_base_url: image_base_url.into(),
        })
    }

    /// Fetch random images.
    ///
    /// `nsfw = None` omits the filter and yields mixed results; the random
    /// endpoint does not support tag filtering.
    pub async fn random_images(&self, count: u32, nsfw: Option<bool>) -> Result<Vec<NekosImage>> {
        let mut url = format!("{}/random/image?count={}", self.base_url, count);
        if let Some(nsfw) = nsfw {
            url.push_str(if nsfw { "&nsfw=true" } else { "&nsfw=false" });
        }

        debug!(count, ?nsfw, "fetching random nekos.moe images");
        let resp = self.client.get(&url).send().await?;
        let images: ImagesResponse = decode(resp).await?;
        Ok(images.images)
    }

    /// Search images by tag. Tags and rating go through the query builder so
    /// spaces and reserved characters are percent-encoded.
    pub async fn search_images(
        &self,
        tags: &[&str],
        count: u32,
        rating: Option<&str>,
    ) -> Result<Vec<NekosImage>> {
        let url = format!("{}/images/search", self.base_url);
        let mut params: Vec<(&str, String)> = vec![("count", count.to_string())];
        for tag in tags {
            params.push(("tags", (*tag).to_string()));
        }
        if let Some(rating) = rating {
            params.push(("rating", rating.to_string()));
        }

        let resp = self.client.get(&url).query(&params).send().await?;
        let images: ImagesResponse = decode(resp).await?;
        Ok(images.images)
    }

    /// Fetch a single image record by ID.
    pub async fn image_by_id(&self, id: &str) -> Result<NekosImage> {
        let url = format!("{}/images/{}", self.base_url, id);
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }

    /// Displayable URL for an image ID. All nekos.moe images are served as JPG.
    pub fn image_url(&self, id: &str) -> String {
        format!("{}/{}.jpg", self.image_base_url, id)
    }

    /// Download the image bytes for an ID.
    pub async fn download(&self, id: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(self.image_url(id)).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::Api {
                status: resp.status().as_u16(),
                body: String::new(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Decode a JSON body, surfacing non-2xx responses with their body text.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.json().await?)
}
