//! Playback state: queue, current index, and transport flags.

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Episode, Queue};

/// Single source of truth for what is queued and how it should play.
///
/// Every operation is total. Callers that need to share the state between
/// views and the transport controller go through [`crate::PlayerStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerState {
    queue: Queue,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play a single episode, replacing the queue.
    pub fn play(&mut self, episode: Episode) {
        debug!("Playing single episode {}", episode.id);
        self.queue.replace(vec![episode], 0);
        self.is_playing = true;
    }

    /// Play `list` starting at `index`. `index` must be within the list.
    pub fn play_queue(&mut self, list: Vec<Episode>, index: usize) {
        debug!("Playing queue of {} episodes from {index}", list.len());
        self.queue.replace(list, index);
        self.is_playing = true;
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
    }

    pub fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
    }

    /// Reconcile with the state reported by the media resource.
    pub fn set_playing_state(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Advance to the next episode, or a random one while shuffling.
    pub fn play_next(&mut self) {
        self.play_next_with(&mut rand::thread_rng());
    }

    /// [`Self::play_next`] with an explicit random source.
    ///
    /// Shuffle picks uniformly over the whole queue and may land on the
    /// current episode again.
    pub fn play_next_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.is_shuffling {
            if self.queue.is_empty() {
                return;
            }
            let index = rng.gen_range(0..self.queue.len());
            debug!("Shuffle picked index {index}");
            self.queue.jump_to(index);
        } else if self.has_next() {
            self.queue.step_forward();
        }
    }

    pub fn play_previous(&mut self) {
        if self.has_previous() {
            self.queue.step_back();
        }
    }

    /// Empty the queue. `is_playing` is left for the caller to settle.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub const fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn episodes(&self) -> &[Episode] {
        self.queue.items()
    }

    pub const fn current_index(&self) -> usize {
        self.queue.current_index()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.queue.current()
    }

    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub const fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub const fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    pub const fn has_previous(&self) -> bool {
        self.queue.has_previous()
    }

    pub const fn has_next(&self) -> bool {
        self.is_shuffling || self.queue.has_next_in_order()
    }

    /// Take an immutable copy for observers.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            episodes: self.queue.items().to_vec(),
            current_index: self.current_index(),
            is_playing: self.is_playing,
            is_looping: self.is_looping,
            is_shuffling: self.is_shuffling,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
        }
    }
}

/// Point-in-time view of the player, published to every subscriber.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub episodes: Vec<Episode>,
    pub current_index: usize,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PlayerSnapshot {
    pub fn current_episode(&self) -> Option<&Episode> {
        self.episodes.get(self.current_index)
    }

    pub fn has_episode(&self) -> bool {
        self.current_episode().is_some()
    }

    /// Shuffling a single episode is meaningless, so the control is disabled.
    pub fn can_toggle_shuffle(&self) -> bool {
        self.has_episode() && self.episodes.len() > 1
    }

    pub fn can_play_previous(&self) -> bool {
        self.has_episode() && self.has_previous
    }

    pub fn can_play_next(&self) -> bool {
        self.has_episode() && self.has_next
    }

    /// Play/pause and loop are available whenever something is loaded.
    pub fn can_control(&self) -> bool {
        self.has_episode()
    }
}
