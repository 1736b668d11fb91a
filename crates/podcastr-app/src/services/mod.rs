//! Backend services integration.

pub mod audio;

pub use audio::AudioService;
