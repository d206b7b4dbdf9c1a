//! Educational video search: YouTube Data API client plus keyword filtering and engagement ranking.

pub mod client;
mod keywords;
pub mod ranking;
pub mod types;

pub use client::{VideoSource, YouTubeClient};
pub use ranking::{rank, sort_for_display};
pub use types::RankedVideo;
