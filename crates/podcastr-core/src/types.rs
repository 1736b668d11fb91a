//! Core domain types for Podcastr.

pub mod common;
pub mod episode;
pub mod queue;

pub use common::{format_duration, Duration};
pub use episode::Episode;
pub use queue::Queue;
