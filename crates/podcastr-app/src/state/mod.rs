//! Application state management.

use chrono::Locale;
use dioxus::prelude::*;
use podcastr_api::EpisodesClient;
use podcastr_core::{PlayerSnapshot, PlayerStore};

use crate::config::AppConfig;

/// Which page the main area shows.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    /// Detail page for an episode id.
    Episode(String),
}

/// Global application state, provided through the root context.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative playback state; the signals below mirror it.
    pub store: PlayerStore,
    pub client: EpisodesClient,
    pub config: AppConfig,
    pub route: Signal<Route>,
    pub player: Signal<PlayerSnapshot>,
    /// Whole seconds played of the current episode.
    pub progress: Signal<u64>,
    /// Length of the current episode in seconds.
    pub duration: Signal<u64>,
}

impl AppState {
    pub fn new(config: AppConfig, client: EpisodesClient) -> Self {
        let store = PlayerStore::new();
        Self {
            player: Signal::new(store.snapshot()),
            store,
            client,
            config,
            route: Signal::new(Route::Home),
            progress: Signal::new(0),
            duration: Signal::new(0),
        }
    }

    pub fn navigate(&mut self, route: Route) {
        self.route.set(route);
    }

    pub fn locale(&self) -> Locale {
        self.config.locale()
    }
}
