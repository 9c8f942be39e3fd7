use std::sync::Arc;

use anyhow::Context as _;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "momo_bot=info,momo_discord=info,momo_scheduler=info,momo_webhook=info,momo_core=info,momo_providers=info".into()),
        )
        .init();

    // load config: MOMO_CONFIG env > ~/.momo/momo.toml
    let config_path = std::env::var("MOMO_CONFIG").ok();
    let config = momo_core::config::MomoConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({e}), using defaults");
        momo_core::config::MomoConfig::default()
    });

    if config.discord.bot_token.is_empty() {
        anyhow::bail!(
            "no Discord bot token configured (set discord.bot_token or DISCORD_BOT_TOKEN)"
        );
    }

    let settings = Arc::new(
        momo_core::settings::SettingsStore::load(&config.storage.settings_path)
            .context("opening settings file")?,
    );

    let nekos = Arc::new(momo_providers::NekosClient::new(&config.providers.user_agent)?);
    let waifu = Arc::new(momo_providers::WaifuClient::new(&config.providers.user_agent)?);

    // The persisted toggle from the last run wins over the in-memory default.
    let webhook = Arc::new(momo_webhook::DailyWebhook::new(
        &config.daily,
        Arc::clone(&nekos),
        Arc::clone(&waifu),
    ));
    webhook.set_enabled(settings.daily_enabled());

    let trigger = momo_scheduler::Trigger::new(config.daily.hour, config.daily.minute);
    let scheduler = Arc::new(momo_scheduler::DailyScheduler::new(
        Arc::clone(&webhook),
        trigger,
        momo_scheduler::RetryPolicy::default(),
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    if let Err(e) = scheduler.start(shutdown_rx) {
        warn!("daily scheduler not started: {e}");
    }

    let ctx = Arc::new(momo_discord::BotContext {
        nekos,
        waifu,
        webhook,
        scheduler: Arc::clone(&scheduler),
        settings,
    });
    let adapter = momo_discord::DiscordAdapter::new(&config.discord, ctx);
    tokio::spawn(async move { adapter.run().await });
    info!("Momo is online");

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutting down");

    let _ = shutdown_tx.send(true);
    if scheduler.is_running() {
        let _ = scheduler.stop();
    }
    Ok(())
}
