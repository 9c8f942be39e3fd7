use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (momo.toml + MOMO_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomoConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub daily: DailyConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for MomoConfig {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            daily: DailyConfig::default(),
            providers: ProvidersConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token. Falls back to the DISCORD_BOT_TOKEN env var when empty.
    #[serde(default)]
    pub bot_token: String,
    /// "Listening to ..." presence text.
    #[serde(default = "default_activity")]
    pub activity: String,
    /// Register and answer global slash commands (default: true).
    #[serde(default = "bool_true")]
    pub slash_commands: bool,
    /// Answer `!`-prefixed message commands (default: true).
    #[serde(default = "bool_true")]
    pub prefix_commands: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            activity: default_activity(),
            slash_commands: true,
            prefix_commands: true,
        }
    }
}

/// Daily webhook delivery settings.
///
/// The trigger time and the set of participating image providers are
/// configuration, not constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyConfig {
    /// Discord webhook URL. Falls back to the WEBHOOK_URL env var when unset.
    pub webhook_url: Option<String>,
    /// Local hour of the daily trigger (0-23).
    #[serde(default = "default_hour")]
    pub hour: u32,
    /// Local minute of the daily trigger (0-59).
    #[serde(default)]
    pub minute: u32,
    /// Include a waifu.im picture in the daily bundle.
    #[serde(default = "bool_true")]
    pub include_waifu: bool,
    /// Include a nekos.moe picture in the daily bundle.
    #[serde(default = "bool_true")]
    pub include_catgirl: bool,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            hour: default_hour(),
            minute: 0,
            include_waifu: true,
            include_catgirl: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// User-Agent sent with every image API request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON settings file.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_activity() -> String {
    "Looking at anime girls".to_string()
}
fn default_hour() -> u32 {
    5
}
fn default_user_agent() -> String {
    "Momo (momo-bot, v0.1.0)".to_string()
}
fn default_settings_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.momo/settings.json", home)
}
fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.momo/momo.toml", home)
}

impl MomoConfig {
    /// Load config from a TOML file with MOMO_* env var overrides.
    ///
    /// A missing file is not an error: defaults merged with env vars are
    /// returned instead, so the bot can run from env configuration alone.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let mut config: MomoConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("MOMO_").split("__"))
            .extract()
            .map_err(|e| crate::error::MomoError::Config(e.to_string()))?;

        // Bare env fallbacks for the two secrets that predate the TOML layout.
        if config.discord.bot_token.is_empty() {
            if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
                config.discord.bot_token = token;
            }
        }
        if config.daily.webhook_url.is_none() {
            if let Ok(url) = std::env::var("WEBHOOK_URL") {
                if !url.is_empty() {
                    config.daily.webhook_url = Some(url);
                }
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = MomoConfig::default();
        assert_eq!(config.daily.hour, 5);
        assert_eq!(config.daily.minute, 0);
        assert!(config.daily.include_waifu);
        assert!(config.daily.include_catgirl);
        assert!(config.discord.slash_commands);
        assert!(config.storage.settings_path.ends_with("settings.json"));
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = r#"
            [discord]
            bot_token = "abc"

            [daily]
            webhook_url = "https://discord.com/api/webhooks/1/t"
            hour = 0
            include_waifu = false
        "#;
        let config: MomoConfig = Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .unwrap();
        assert_eq!(config.discord.bot_token, "abc");
        assert_eq!(config.daily.hour, 0);
        assert!(!config.daily.include_waifu);
        assert!(config.daily.include_catgirl);
        assert_eq!(
            config.daily.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/t")
        );
    }
}
