//! Playback queue.

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use serde::{Deserialize, Serialize};

use super::Episode;

/// Ordered episodes loaded for playback plus a pointer to the one in focus.
///
/// `current_index` is always a valid index into `items`, or `0` when the
/// queue is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Queue {
    /// All episodes in play order.
    items: Vec<Episode>,
    /// Current playback index.
    current_index: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all episodes in the queue.
    pub fn items(&self) -> &[Episode] {
        &self.items
    }

    /// Get the current episode.
    pub fn current(&self) -> Option<&Episode> {
        self.items.get(self.current_index)
    }

    /// Get the current index.
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Get the number of episodes in the queue.
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the queue is empty.
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the queue contents, pointing at `start_index`.
    ///
    /// `start_index` must be in range for a non-empty list. Release builds
    /// clamp it so the index invariant holds regardless.
    pub fn replace(&mut self, items: Vec<Episode>, start_index: usize) {
        debug_assert!(
            items.is_empty() || start_index < items.len(),
            "start index {start_index} out of range for queue of {}",
            items.len()
        );
        self.current_index = if items.is_empty() {
            0
        } else {
            start_index.min(items.len() - 1)
        };
        self.items = items;
    }

    /// Clear the entire queue.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_index = 0;
    }

    /// Whether there is an episode before the current one.
    pub const fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Whether there is an episode after the current one in insertion order.
    pub const fn has_next_in_order(&self) -> bool {
        self.current_index + 1 < self.items.len()
    }

    /// Move to the next episode in order. Stays put at the end.
    pub fn step_forward(&mut self) {
        if self.has_next_in_order() {
            self.current_index += 1;
        }
    }

    /// Move to the previous episode. Stays put at the start.
    pub fn step_back(&mut self) {
        if self.has_previous() {
            self.current_index -= 1;
        }
    }

    /// Jump to a specific index. Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> Option<&Episode> {
        if index < self.items.len() {
            self.current_index = index;
            self.items.get(index)
        } else {
            None
        }
    }
}
