//! # podcastr-core
//!
//! Core types, the playback state store, and error handling for the Podcastr
//! podcast player.

pub mod error;
pub mod player;
pub mod store;
pub mod types;

pub use error::{Error, HttpError, Result};
pub use player::{PlayerSnapshot, PlayerState};
pub use store::PlayerStore;
pub use types::*;
