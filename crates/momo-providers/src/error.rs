use thiserror::Error;

/// Errors from the image provider clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no images returned")]
    Empty,
}

pub type Result<T> = std::result::Result<T, ProviderError>;
