//! `momo-scheduler`: the daily delivery loop.
//!
//! # Overview
//!
//! [`DailyScheduler`] owns a single background task that fires once per day
//! at a fixed local time. Each firing runs one *cycle*: up to
//! [`RetryPolicy::max_attempts`] calls to [`DailySender::send`] with an
//! increasing backoff between failures. Delivery failures are logged, never
//! escalated; the loop has no synchronous caller to report to.
//!
//! # Lifecycle
//!
//! | Operation      | Guard                                  |
//! |----------------|----------------------------------------|
//! | `start`        | Error when already running; success no-op when the sender is disabled |
//! | `stop`         | Error when not running                 |
//! | `force_send`   | Error when the sender is disabled; otherwise fire-and-forget |
//! | `is_running`   | Safe concurrently with start/stop      |
//!
//! The run-loop waits on exactly three events: upstream cancellation, an
//! explicit stop request, and the trigger deadline. It never polls.

pub mod daily;
pub mod error;
pub mod sender;
pub mod trigger;

pub use daily::{DailyScheduler, RetryPolicy, BASE_BACKOFF, MAX_ATTEMPTS};
pub use error::{Result, SchedulerError};
pub use sender::{DailySender, SenderStatus};
pub use trigger::Trigger;
