//! Twitter/X API integration surface.
//!
//! Submodules provide the HTTP client wrapper, cursor pagination, the
//! filtered-stream runner with its listener trait, JSON extraction helpers,
//! and strongly typed response models.
pub mod client;
pub mod extract;
pub mod paginate;
pub mod stream;
pub mod types;

pub use client::TwitterApi;
pub use stream::{FileSinkListener, ListenerFlow, StreamListener};
