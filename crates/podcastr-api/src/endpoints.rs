//! Endpoint implementations on [`crate::EpisodesClient`].

pub mod episodes;
