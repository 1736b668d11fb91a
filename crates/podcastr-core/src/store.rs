//! Shared, observable handle around [`PlayerState`].

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::player::{PlayerSnapshot, PlayerState};
use crate::types::Episode;

/// Injectable player store.
///
/// Clones share the same state. Every mutation publishes a fresh
/// [`PlayerSnapshot`] to all subscribers before returning.
#[derive(Clone, Default)]
pub struct PlayerStore {
    state: Arc<RwLock<PlayerState>>,
    subscribers: Arc<Mutex<Vec<Sender<PlayerSnapshot>>>>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive a snapshot after every subsequent mutation.
    pub fn subscribe(&self) -> Receiver<PlayerSnapshot> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.state.read().snapshot()
    }

    /// Read the state without cloning it.
    pub fn read<T>(&self, f: impl FnOnce(&PlayerState) -> T) -> T {
        f(&*self.state.read())
    }

    pub fn current_episode(&self) -> Option<Episode> {
        self.state.read().current_episode().cloned()
    }

    pub fn is_playing(&self) -> bool {
        self.state.read().is_playing()
    }

    pub fn has_next(&self) -> bool {
        self.state.read().has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.state.read().has_previous()
    }

    pub fn play(&self, episode: Episode) {
        self.update(|state| state.play(episode));
    }

    pub fn play_queue(&self, list: Vec<Episode>, index: usize) {
        self.update(|state| state.play_queue(list, index));
    }

    pub fn toggle_play(&self) {
        self.update(PlayerState::toggle_play);
    }

    pub fn toggle_loop(&self) {
        self.update(PlayerState::toggle_loop);
    }

    pub fn toggle_shuffle(&self) {
        self.update(PlayerState::toggle_shuffle);
    }

    pub fn set_playing_state(&self, playing: bool) {
        self.update(|state| state.set_playing_state(playing));
    }

    pub fn play_next(&self) {
        self.update(PlayerState::play_next);
    }

    pub fn play_previous(&self) {
        self.update(PlayerState::play_previous);
    }

    pub fn clear(&self) {
        self.update(PlayerState::clear);
    }

    fn update(&self, f: impl FnOnce(&mut PlayerState)) {
        let snapshot = {
            let mut state = self.state.write();
            f(&mut *state);
            state.snapshot()
        };
        self.publish(&snapshot);
    }

    fn publish(&self, snapshot: &PlayerSnapshot) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        trace!("Published player snapshot to {} subscribers", subscribers.len());
    }
}

impl std::fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStore")
            .field("state", &*self.state.read())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(count: usize) -> Vec<Episode> {
        (0..count)
            .map(|i| Episode::new(format!("ep-{i}"), format!("Episode {i}")))
            .collect()
    }

    #[test]
    fn test_mutation_visible_to_clones() {
        let store = PlayerStore::new();
        let view = store.clone();

        store.play_queue(episodes(3), 1);
        assert_eq!(view.current_episode().unwrap().id, "ep-1");
        assert!(view.is_playing());
    }

    #[test]
    fn test_subscribers_receive_every_mutation() {
        let store = PlayerStore::new();
        let rx = store.subscribe();

        store.play(Episode::new("a", "A"));
        store.toggle_play();
        store.toggle_loop();

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(received[0].is_playing);
        assert!(!received[1].is_playing);
        assert!(received[2].is_looping);
    }

    #[test]
    fn test_snapshot_published_before_return() {
        let store = PlayerStore::new();
        let rx = store.subscribe();

        store.play_queue(episodes(2), 0);
        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot.current_episode().unwrap().id, "ep-0");
        assert!(snapshot.has_next);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let store = PlayerStore::new();
        let rx = store.subscribe();
        let _kept = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        drop(rx);
        store.toggle_shuffle();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_clear_after_end_of_queue() {
        let store = PlayerStore::new();
        store.play(Episode::new("a", "A"));
        assert!(!store.has_next());

        store.clear();
        assert!(store.current_episode().is_none());
        assert_eq!(store.read(PlayerState::current_index), 0);
    }
}
