//! Episode detail page.

use dioxus::prelude::*;
use podcastr_core::{Episode, Error};

use super::icons::{BackIcon, PlayIcon};
use crate::state::{AppState, Route};

#[component]
pub fn EpisodePage(id: String) -> Element {
    let mut app_state = use_context::<AppState>();
    let client = app_state.client.clone();

    let episode = use_resource(move || {
        let client = client.clone();
        let id = id.clone();
        async move { client.episode(&id).await }
    });

    let content = match &*episode.read() {
        None => rsx! {
            div { class: "status", "Carregando episódio..." }
        },
        Some(Err(Error::NotFound(_))) => rsx! {
            div { class: "status status--error", "Episódio não encontrado." }
        },
        Some(Err(e)) => rsx! {
            div { class: "status status--error", "Não foi possível carregar o episódio: {e}" }
        },
        Some(Ok(episode)) => rsx! {
            EpisodeDetail { episode: episode.clone() }
        },
    };

    rsx! {
        div { class: "episode",
            button {
                class: "episode__back",
                r#type: "button",
                title: "Voltar",
                onclick: move |_| app_state.navigate(Route::Home),
                BackIcon {}
            }
            {content}
        }
    }
}

#[component]
fn EpisodeDetail(episode: Episode) -> Element {
    let app_state = use_context::<AppState>();
    let duration = episode.duration_label();
    let description = episode.description.clone().unwrap_or_default();
    let to_play = episode.clone();

    rsx! {
        div { class: "episode__thumbnail",
            img { src: "{episode.thumbnail}", alt: "{episode.title}" }
            button {
                class: "episode__play",
                r#type: "button",
                title: "Tocar episódio",
                onclick: move |_| app_state.store.play(to_play.clone()),
                PlayIcon {}
            }
        }

        header { class: "episode__header",
            h2 { "{episode.title}" }
            span { "{episode.members}" }
            span { "{episode.published_at}" }
            span { "{duration}" }
        }

        div { class: "episode__description", dangerous_inner_html: "{description}" }
    }
}
