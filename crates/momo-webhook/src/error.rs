use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// No webhook URL configured or the feature toggle is off.
    #[error("daily webhook is disabled")]
    Disabled,

    #[error("image provider error: {0}")]
    Provider(#[from] momo_providers::ProviderError),

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {status}")]
    Status { status: u16 },
}

pub type Result<T> = std::result::Result<T, WebhookError>;
