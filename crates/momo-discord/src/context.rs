//! Shared application state handed to every command handler.

use std::sync::Arc;

use momo_core::settings::SettingsStore;
use momo_providers::{NekosClient, WaifuClient};
use momo_scheduler::DailyScheduler;
use momo_webhook::DailyWebhook;

/// Everything the Discord handlers need: the two image clients, the daily
/// webhook sender, its scheduler, and the persistent settings.
pub struct BotContext {
    pub nekos: Arc<NekosClient>,
    pub waifu: Arc<WaifuClient>,
    pub webhook: Arc<DailyWebhook>,
    pub scheduler: Arc<DailyScheduler<DailyWebhook>>,
    pub settings: Arc<SettingsStore>,
}
