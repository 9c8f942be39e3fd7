use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error(transparent)]
    Provider(#[from] momo_providers::ProviderError),

    #[error(transparent)]
    Core(#[from] momo_core::MomoError),
}
