//! # podcastr-audio
//!
//! Playback side of Podcastr.
//!
//! - [`MediaResource`]: the load/play/pause/seek surface a player drives
//! - [`TransportController`]: binds a [`podcastr_core::PlayerStore`] to one resource
//! - [`AudioEngine`]: symphonia + cpal implementation on a worker thread

pub mod controller;
pub mod decode;
pub mod engine;
pub mod output;
pub mod resource;

pub use controller::{TransportController, TransportState};
pub use engine::AudioEngine;
pub use resource::{LoadId, MediaEvent, MediaEventKind, MediaResource};
