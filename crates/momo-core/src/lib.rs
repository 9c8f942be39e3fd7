//! `momo-core`: configuration, shared error type, and the settings store.

pub mod config;
pub mod error;
pub mod settings;

pub use config::MomoConfig;
pub use error::{MomoError, Result};
pub use settings::SettingsStore;
