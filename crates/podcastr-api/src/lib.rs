//! # podcastr-api
//!
//! Client for the remote episode API that feeds Podcastr.
//!
//! The API is read-only: a list endpoint with `_limit`/`_sort`/`_order`
//! query parameters and a detail endpoint per episode id. Raw records are
//! validated into [`podcastr_core::Episode`] at the boundary in [`parser`].

pub mod client;
pub mod endpoints;
pub mod parser;
pub mod types;

pub use client::{ClientConfig, EpisodesClient};
pub use types::{EpisodeQuery, HomeFeed, SortOrder};
