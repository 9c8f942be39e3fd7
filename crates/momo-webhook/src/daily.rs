use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use momo_core::config::DailyConfig;
use momo_providers::{NekosClient, NsfwMode, ProviderError, WaifuClient};
use momo_scheduler::{DailySender, SenderStatus};

use crate::error::{Result, WebhookError};
use crate::payload::{self, is_discord_webhook_url, WebhookPayload};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct WebhookState {
    enabled: bool,
    last_sent: Option<DateTime<Utc>>,
}

/// The daily delivery sender: fetches one picture per participating provider
/// and POSTs the bundle to a Discord webhook.
///
/// Owns the enabled flag the control surface toggles; the scheduler only
/// reads it through [`DailySender::is_enabled`].
pub struct DailyWebhook {
    client: reqwest::Client,
    /// Destination webhook URL; empty means unconfigured.
    url: String,
    nekos: Arc<NekosClient>,
    waifu: Arc<WaifuClient>,
    include_waifu: bool,
    include_catgirl: bool,
    state: RwLock<WebhookState>,
}

impl DailyWebhook {
    pub fn new(config: &DailyConfig, nekos: Arc<NekosClient>, waifu: Arc<WaifuClient>) -> Self {
        let url = config.webhook_url.clone().unwrap_or_default();
        if !url.is_empty() && !is_discord_webhook_url(&url) {
            warn!(%url, "webhook URL does not look like a Discord webhook URL");
        }

        Self {
            client: reqwest::Client::new(),
            url,
            nekos,
            waifu,
            include_waifu: config.include_waifu,
            include_catgirl: config.include_catgirl,
            state: RwLock::new(WebhookState {
                enabled: true,
                last_sent: None,
            }),
        }
    }

    /// True when the toggle is on AND a destination is configured.
    pub fn is_enabled(&self) -> bool {
        self.state.read().unwrap().enabled && !self.url.is_empty()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.write().unwrap().enabled = enabled;
        info!(enabled, "daily webhook toggle updated");
    }

    /// Flip the toggle. Returns the new value.
    pub fn toggle(&self) -> bool {
        let mut state = self.state.write().unwrap();
        state.enabled = !state.enabled;
        info!(enabled = state.enabled, "daily webhook toggled");
        state.enabled
    }

    /// Raw toggle value and destination URL, for the control surface.
    pub fn status(&self) -> (bool, String) {
        (self.state.read().unwrap().enabled, self.url.clone())
    }

    pub fn last_sent(&self) -> Option<DateTime<Utc>> {
        self.state.read().unwrap().last_sent
    }

    /// One full fetch-and-deliver side effect.
    ///
    /// Fetches one image from each participating provider (mixed-rating
    /// random selection), then POSTs the bundle. Safe to call repeatedly in
    /// a retry sequence; each call produces its own fetch and post.
    pub async fn send_daily(&self) -> Result<()> {
        if !self.is_enabled() {
            return Err(WebhookError::Disabled);
        }

        info!(destination = %self.url, "starting daily webhook delivery");

        let waifu_url = if self.include_waifu {
            let images = self.waifu.images(NsfwMode::All, 1, false).await?;
            if images.is_empty() {
                warn!("waifu.im returned no images; daily bundle will go out without one");
            }
            images.first().map(|img| img.url.clone())
        } else {
            None
        };

        let catgirl_url = if self.include_catgirl {
            let images = self.nekos.random_images(1, None).await?;
            if images.is_empty() {
                warn!("nekos.moe returned no images; daily bundle will go out without one");
            }
            images.first().map(|img| self.nekos.image_url(&img.id))
        } else {
            None
        };

        if waifu_url.is_none() && catgirl_url.is_none() {
            return Err(ProviderError::Empty.into());
        }

        let payload = payload::daily_payload(waifu_url.as_deref(), catgirl_url.as_deref());
        self.post(&payload).await?;

        self.state.write().unwrap().last_sent = Some(Utc::now());
        info!("daily webhook delivered");
        Ok(())
    }

    async fn post(&self, payload: &WebhookPayload) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "webhook rejected payload");
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DailySender for DailyWebhook {
    fn is_enabled(&self) -> bool {
        DailyWebhook::is_enabled(self)
    }

    async fn send(&self) -> anyhow::Result<()> {
        self.send_daily().await?;
        Ok(())
    }

    fn status(&self) -> SenderStatus {
        SenderStatus {
            enabled: DailyWebhook::is_enabled(self),
            destination: self.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use momo_core::config::DailyConfig;

    const NEKOS_BODY: &str = r#"{"images": [{"id": "neko1", "nsfw": false}]}"#;
    const WAIFU_BODY: &str =
        r#"{"items": [{"id": 7, "url": "https://cdn.waifu.im/7.png", "extension": ".png"}]}"#;

    fn webhook_against(server: &mockito::Server, include_waifu: bool) -> DailyWebhook {
        let config = DailyConfig {
            webhook_url: Some(format!("{}/hook", server.url())),
            include_waifu,
            ..DailyConfig::default()
        };
        let nekos =
            Arc::new(NekosClient::with_base_url("momo-test", server.url(), server.url()).unwrap());
        let waifu = Arc::new(WaifuClient::with_base_url("momo-test", server.url()).unwrap());
        DailyWebhook::new(&config, nekos, waifu)
    }

    #[test]
    fn disabled_without_url() {
        let config = DailyConfig::default();
        let nekos = Arc::new(NekosClient::new("momo-test").unwrap());
        let waifu = Arc::new(WaifuClient::new("momo-test").unwrap());
        let webhook = DailyWebhook::new(&config, nekos, waifu);

        // Toggle is on but no destination is configured.
        let (enabled, url) = webhook.status();
        assert!(enabled);
        assert!(url.is_empty());
        assert!(!webhook.is_enabled());
    }

    #[test]
    fn toggle_flips_state() {
        let server = mockito::Server::new();
        let webhook = webhook_against(&server, true);

        assert!(webhook.is_enabled());
        assert!(!webhook.toggle());
        assert!(!webhook.is_enabled());
        assert!(webhook.toggle());
        assert!(webhook.is_enabled());
    }

    #[tokio::test]
    async fn send_daily_posts_bundle_and_stamps_last_sent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/random/image?count=1")
            .with_status(200)
            .with_body(NEKOS_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/?IsNsfw=All&pageSize=1")
            .with_status(200)
            .with_body(WAIFU_BODY)
            .create_async()
            .await;
        let hook = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .with_status(204)
            .create_async()
            .await;

        let webhook = webhook_against(&server, true);
        assert!(webhook.last_sent().is_none());
        webhook.send_daily().await.unwrap();

        hook.assert_async().await;
        assert!(webhook.last_sent().is_some());
    }

    #[tokio::test]
    async fn send_daily_skips_excluded_provider() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/random/image?count=1")
            .with_status(200)
            .with_body(NEKOS_BODY)
            .create_async()
            .await;
        let hook = server
            .mock("POST", "/hook")
            .with_status(204)
            .create_async()
            .await;

        // include_waifu = false: no waifu.im request is made at all.
        let webhook = webhook_against(&server, false);
        webhook.send_daily().await.unwrap();
        hook.assert_async().await;
    }

    #[tokio::test]
    async fn empty_provider_result_still_delivers_the_rest() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/random/image?count=1")
            .with_status(200)
            .with_body(NEKOS_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/?IsNsfw=All&pageSize=1")
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;
        let hook = server
            .mock("POST", "/hook")
            .with_status(204)
            .create_async()
            .await;

        // waifu.im came back empty; the catgirl half still goes out.
        let webhook = webhook_against(&server, true);
        webhook.send_daily().await.unwrap();
        hook.assert_async().await;
        assert!(webhook.last_sent().is_some());
    }

    #[tokio::test]
    async fn non_2xx_webhook_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/random/image?count=1")
            .with_status(200)
            .with_body(NEKOS_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/?IsNsfw=All&pageSize=1")
            .with_status(200)
            .with_body(WAIFU_BODY)
            .create_async()
            .await;
        server
            .mock("POST", "/hook")
            .with_status(400)
            .create_async()
            .await;

        let webhook = webhook_against(&server, true);
        match webhook.send_daily().await {
            Err(WebhookError::Status { status }) => assert_eq!(status, 400),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(webhook.last_sent().is_none());
    }

    #[tokio::test]
    async fn send_daily_while_disabled_is_an_error() {
        let server = mockito::Server::new_async().await;
        let webhook = webhook_against(&server, true);
        webhook.set_enabled(false);

        assert!(matches!(
            webhook.send_daily().await,
            Err(WebhookError::Disabled)
        ));
    }
}
