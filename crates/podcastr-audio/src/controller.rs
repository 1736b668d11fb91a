//! Transport controller: keeps a [`MediaResource`] in step with a [`PlayerStore`].
//!
//! Store snapshots become resource commands and resource events become store
//! mutations. Everything happens inside [`TransportController::pump`], which
//! the UI calls from a single task, so ordering is simply arrival order.

use crossbeam_channel::Receiver;
use podcastr_core::{format_duration, Duration, PlayerSnapshot, PlayerStore, Result};
use tracing::{debug, info, trace, warn};

use crate::resource::{LoadId, MediaEvent, MediaEventKind, MediaResource};

/// Coarse transport state for the player panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Nothing in the queue.
    #[default]
    Idle,
    Paused,
    Playing,
}

/// Sole owner of a media resource and its only event subscriber.
pub struct TransportController<R: MediaResource> {
    store: PlayerStore,
    updates: Receiver<PlayerSnapshot>,
    resource: R,
    /// Last snapshot turned into commands.
    applied: PlayerSnapshot,
    loaded_url: Option<String>,
    current_load: Option<LoadId>,
    /// Load whose progress notifications are being displayed.
    progress_load: Option<LoadId>,
    progress: u64,
    media_duration: Option<f64>,
    /// Play/pause commands sent to the current load whose
    /// `PlayStateChanged` reply has not arrived yet.
    unconfirmed_play_state: u32,
}

impl<R: MediaResource> TransportController<R> {
    /// Subscribe to `store` and apply its current state to `resource`.
    pub fn new(store: PlayerStore, resource: R) -> Self {
        let updates = store.subscribe();
        let initial = store.snapshot();
        let mut controller = Self {
            store,
            updates,
            resource,
            applied: PlayerSnapshot::default(),
            loaded_url: None,
            current_load: None,
            progress_load: None,
            progress: 0,
            media_duration: None,
            unconfirmed_play_state: 0,
        };
        controller.apply(initial);
        controller
    }

    /// Process pending store updates and media events in arrival order.
    ///
    /// Returns how many updates and events were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = self.drain_updates();
        while let Some(event) = self.resource.try_recv_event() {
            self.handle_event(event);
            handled += 1 + self.drain_updates();
        }
        handled
    }

    /// Jump to `target` seconds, clamped to the episode length.
    ///
    /// The displayed progress moves immediately.
    pub fn seek(&mut self, target: f64) {
        if self.current_load.is_none() {
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let max = self.duration_seconds() as f64;
        let target = if target.is_finite() {
            target.clamp(0.0, max)
        } else {
            0.0
        };

        debug!("Seeking to {target:.1}s");
        self.command("seek", |r| r.seek(target));
        self.progress = Duration::from_secs_f64(target).as_seconds();
    }

    pub fn state(&self) -> TransportState {
        match (self.applied.has_episode(), self.applied.is_playing) {
            (false, _) => TransportState::Idle,
            (true, true) => TransportState::Playing,
            (true, false) => TransportState::Paused,
        }
    }

    /// Whole seconds played of the current episode.
    pub const fn progress(&self) -> u64 {
        self.progress
    }

    pub fn progress_label(&self) -> String {
        format_duration(self.progress)
    }

    /// Episode length in seconds, falling back to the decoded length when
    /// the catalogue has none.
    pub fn duration_seconds(&self) -> u64 {
        let listed = self
            .applied
            .current_episode()
            .map_or(0, |e| e.duration.as_seconds());
        if listed > 0 {
            return listed;
        }
        self.media_duration
            .map_or(0, |d| Duration::from_secs_f64(d).as_seconds())
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.duration_seconds())
    }

    /// The snapshot the resource currently reflects.
    pub const fn snapshot(&self) -> &PlayerSnapshot {
        &self.applied
    }

    pub const fn current_load(&self) -> Option<LoadId> {
        self.current_load
    }

    pub const fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub const fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    fn drain_updates(&mut self) -> usize {
        let mut count = 0;
        while let Ok(snapshot) = self.updates.try_recv() {
            self.apply(snapshot);
            count += 1;
        }
        count
    }

    fn apply(&mut self, snapshot: PlayerSnapshot) {
        let url = snapshot.current_episode().map(|e| e.url.clone());

        if url != self.loaded_url {
            match url.as_deref() {
                Some(url) => self.load(url, snapshot.is_looping, snapshot.is_playing),
                None => self.unload(),
            }
        } else if url.is_some() {
            if snapshot.is_looping != self.applied.is_looping {
                let looping = snapshot.is_looping;
                self.command("set_looping", |r| r.set_looping(looping));
            }
            if snapshot.is_playing != self.applied.is_playing {
                self.set_resource_playing(snapshot.is_playing);
            }
        }

        self.loaded_url = url;
        self.applied = snapshot;
    }

    fn load(&mut self, url: &str, looping: bool, playing: bool) {
        self.progress = 0;
        self.progress_load = None;
        self.media_duration = None;
        self.unconfirmed_play_state = 0;

        match self.resource.load(url) {
            Ok(load) => {
                info!("Loading {url} ({load})");
                self.current_load = Some(load);
                self.command("set_looping", |r| r.set_looping(looping));
                if playing {
                    self.set_resource_playing(true);
                }
            }
            Err(e) => {
                warn!("Failed to load {url}: {e}");
                self.current_load = None;
            }
        }
    }

    fn unload(&mut self) {
        debug!("Queue empty, unloading media");
        self.command("unload", R::unload);
        self.current_load = None;
        self.progress_load = None;
        self.progress = 0;
        self.media_duration = None;
        self.unconfirmed_play_state = 0;
    }

    fn handle_event(&mut self, event: MediaEvent) {
        if Some(event.load) != self.current_load {
            trace!("Ignoring {:?} from stale {}", event.kind, event.load);
            return;
        }

        match event.kind {
            MediaEventKind::Loaded { duration } => {
                if self.progress_load != Some(event.load) {
                    self.progress = 0;
                    self.progress_load = Some(event.load);
                }
                self.media_duration = duration;
            }
            MediaEventKind::Progress(seconds) => {
                if self.progress_load == Some(event.load) {
                    self.progress = Duration::from_secs_f64(seconds).as_seconds();
                }
            }
            MediaEventKind::PlayStateChanged(playing) => self.handle_play_state(playing),
            MediaEventKind::Ended => self.handle_ended(event.load),
            MediaEventKind::Error(message) => {
                warn!("Media error on {}: {message}", event.load);
            }
        }
    }

    /// Replies to our own play/pause commands arrive in command order and
    /// are consumed without touching the store; only unsolicited changes
    /// (end of media, device loss) are written back.
    fn handle_play_state(&mut self, playing: bool) {
        if self.unconfirmed_play_state > 0 {
            self.unconfirmed_play_state -= 1;
            trace!(
                "Play state reply {playing}, {} outstanding",
                self.unconfirmed_play_state
            );
            return;
        }

        if self.store.is_playing() != playing {
            debug!("Media reported playing={playing}");
            // Already true of the resource, so applying it must not echo a command.
            self.applied.is_playing = playing;
            self.store.set_playing_state(playing);
        }
    }

    fn handle_ended(&mut self, load: LoadId) {
        // The resource stopped by itself; nothing in flight can still apply.
        self.unconfirmed_play_state = 0;

        if !self.store.has_next() {
            debug!("Queue exhausted");
            self.store.clear();
            return;
        }

        self.store.play_next();
        self.store.set_playing_state(true);
        self.drain_updates();

        // Shuffle picked the episode that just ended.
        if self.current_load == Some(load) {
            self.progress = 0;
            // Applying the snapshot may already have resumed it.
            if self.unconfirmed_play_state == 0 {
                self.set_resource_playing(true);
            }
        }
    }

    fn set_resource_playing(&mut self, playing: bool) {
        let sent = if playing {
            self.command("play", R::play)
        } else {
            self.command("pause", R::pause)
        };
        if sent {
            self.unconfirmed_play_state += 1;
        }
    }

    fn command(&mut self, name: &str, f: impl FnOnce(&mut R) -> Result<()>) -> bool {
        match f(&mut self.resource) {
            Ok(()) => true,
            Err(e) => {
                warn!("Media command {name} failed: {e}");
                false
            }
        }
    }
}

impl<R: MediaResource + std::fmt::Debug> std::fmt::Debug for TransportController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportController")
            .field("resource", &self.resource)
            .field("state", &self.state())
            .field("current_load", &self.current_load)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}
