//! Audio service connecting the UI to the transport controller.

use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use parking_lot::Mutex;
use podcastr_audio::{AudioEngine, TransportController};
use podcastr_core::PlayerStore;
use tracing::{error, info};

use crate::state::AppState;

/// How often the controller is pumped.
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

/// Elapsed and total seconds of the current episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    pub progress: u64,
    pub duration: u64,
}

/// Owns the transport controller. Without an audio engine the store still
/// works; only sound is missing.
#[derive(Clone)]
pub struct AudioService {
    store: PlayerStore,
    controller: Arc<Mutex<Option<TransportController<AudioEngine>>>>,
}

impl AudioService {
    pub fn new(store: PlayerStore) -> Self {
        let controller = match AudioEngine::new() {
            Ok(engine) => {
                info!("Audio engine initialized");
                Some(TransportController::new(store.clone(), engine))
            }
            Err(e) => {
                error!("Failed to initialize audio engine: {e}");
                None
            }
        };

        Self {
            store,
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    /// Run one controller step and report the clock.
    pub fn pump(&self) -> Clock {
        let mut guard = self.controller.lock();
        if let Some(controller) = guard.as_mut() {
            controller.pump();
            return Clock {
                progress: controller.progress(),
                duration: controller.duration_seconds(),
            };
        }
        drop(guard);

        Clock {
            progress: 0,
            duration: self
                .store
                .current_episode()
                .map_or(0, |e| e.duration.as_seconds()),
        }
    }

    /// Seek the current episode; returns the clamped progress.
    pub fn seek(&self, seconds: f64) -> u64 {
        self.controller.lock().as_mut().map_or(0, |controller| {
            controller.seek(seconds);
            controller.progress()
        })
    }
}

/// Hook to create the audio service for the app's store.
pub fn use_audio_service(store: PlayerStore) -> Signal<AudioService> {
    use_context_provider(|| Signal::new(AudioService::new(store)))
}

/// Hook mirroring the store and playback clock into the app signals.
/// Call once, in the root component.
pub fn use_audio_sync(audio: Signal<AudioService>, app_state: AppState) {
    let mut player = app_state.player;
    let mut progress = app_state.progress;
    let mut duration = app_state.duration;
    let store = app_state.store;

    use_future(move || {
        let store = store.clone();
        async move {
            loop {
                let clock = audio.read().pump();

                let snapshot = store.snapshot();
                if *player.peek() != snapshot {
                    player.set(snapshot);
                }
                if *progress.peek() != clock.progress {
                    progress.set(clock.progress);
                }
                if *duration.peek() != clock.duration {
                    duration.set(clock.duration);
                }

                tokio::time::sleep(PUMP_INTERVAL).await;
            }
        }
    });
}
