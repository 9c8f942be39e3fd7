//! `momo-providers`: HTTP clients for the two image APIs.
//!
//! | Client        | Service    | Notes                                        |
//! |---------------|------------|----------------------------------------------|
//! | [`NekosClient`] | nekos.moe  | Returns image IDs; full URLs are constructed |
//! | [`WaifuClient`] | waifu.im   | Returns full image URLs                      |
//!
//! Both clients take a configurable base URL so tests can point them at a
//! local mock server.

pub mod error;
pub mod nekos;
pub mod waifu;

pub use error::{ProviderError, Result};
pub use nekos::{NekosClient, NekosImage};
pub use waifu::{NsfwMode, WaifuClient, WaifuImage};
