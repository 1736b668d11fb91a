//! # Podcastr
//!
//! Desktop podcast player built with Rust and Dioxus.

// RSX macros generate code that triggers these warnings incorrectly
#![allow(unused_qualifications)]
#![allow(clippy::use_self)]

mod components;
mod config;
mod services;
mod state;

use anyhow::{Context, Result};
use components::{EpisodePage, Header, Home, Player};
use config::AppConfig;
use dioxus::desktop::{Config, WindowBuilder};
use dioxus::prelude::*;
use podcastr_api::EpisodesClient;
use services::audio::{use_audio_service, use_audio_sync};
use state::{AppState, Route};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WINDOW_WIDTH: f64 = 1280.0;
const WINDOW_HEIGHT: f64 = 800.0;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podcastr=debug,podcastr_app=debug,podcastr_audio=info".into()),
        )
        .init();

    info!("Starting Podcastr v{}", env!("CARGO_PKG_VERSION"));

    let app_config = AppConfig::load();
    let client = EpisodesClient::with_config(app_config.client_config())
        .context("Invalid episode API configuration")?;

    let window = WindowBuilder::new()
        .with_title("Podcastr")
        .with_inner_size(dioxus::desktop::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .with_min_inner_size(dioxus::desktop::LogicalSize::new(960.0, 600.0));

    let config = Config::new()
        .with_window(window)
        .with_disable_context_menu(true)
        .with_menu(None);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .with_context(app_config)
        .with_context(client)
        .launch(App);

    Ok(())
}

/// Root component: header and page on the left, player on the right.
#[component]
fn App() -> Element {
    let app_config = use_context::<AppConfig>();
    let client = use_context::<EpisodesClient>();
    let app_state = use_context_provider(|| AppState::new(app_config, client));

    let audio_service = use_audio_service(app_state.store.clone());
    use_audio_sync(audio_service, app_state.clone());

    let route = app_state.route.read().clone();

    rsx! {
        style { {include_str!("../assets/styles.css")} }

        div { class: "app",
            main { class: "app__main",
                Header {}
                {match route {
                    Route::Home => rsx! { Home {} },
                    Route::Episode(id) => rsx! { EpisodePage { key: "{id}", id } },
                }}
            }
            Player {}
        }
    }
}
