//! `momo-webhook`: the daily delivery sender.
//!
//! [`DailyWebhook`] fetches one picture from each participating provider,
//! wraps them in a Discord webhook payload, and POSTs it to the configured
//! webhook URL. It owns the enabled/destination state the scheduler consults
//! and implements [`momo_scheduler::DailySender`].

pub mod daily;
pub mod error;
pub mod payload;

pub use daily::DailyWebhook;
pub use error::{Result, WebhookError};
