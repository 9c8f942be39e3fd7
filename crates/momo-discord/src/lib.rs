//! `momo-discord`: the Discord front-end.
//!
//! Wraps a serenity `Client` behind [`DiscordAdapter`], which reconnects
//! whenever the gateway drops. Picture commands exist in two forms: legacy
//! `!`-prefixed message commands and global slash commands; both run through
//! the same fetch helpers.

pub mod adapter;
pub mod args;
pub mod commands;
pub mod context;
pub mod error;
pub mod fetch;
pub mod handler;
pub mod prefix;
pub mod send;

pub use adapter::DiscordAdapter;
pub use context::BotContext;
pub use error::DiscordError;
