//! Home page: latest releases and the full episode table.

use dioxus::prelude::*;
use podcastr_api::HomeFeed;
use podcastr_core::Episode;

use super::icons::PlayIcon;
use crate::state::{AppState, Route};

#[component]
pub fn Home() -> Element {
    let app_state = use_context::<AppState>();
    let client = app_state.client.clone();
    let limit = app_state.config.home_limit;
    let latest_count = app_state.config.latest_count;

    let feed = use_resource(move || {
        let client = client.clone();
        async move { client.home_feed(limit, latest_count).await }
    });

    let content = match &*feed.read() {
        None => rsx! {
            div { class: "status", "Carregando episódios..." }
        },
        Some(Err(e)) => rsx! {
            div { class: "status status--error", "Não foi possível carregar os episódios: {e}" }
        },
        Some(Ok(feed)) if feed.is_empty() => rsx! {
            div { class: "status", "Nenhum episódio publicado ainda." }
        },
        Some(Ok(feed)) => rsx! {
            FeedView { feed: feed.clone() }
        },
    };

    rsx! {
        div { class: "home", {content} }
    }
}

#[component]
fn FeedView(feed: HomeFeed) -> Element {
    // Every play button on the page plays from this one list.
    let play_list = feed.play_list();

    rsx! {
        section { class: "latest",
            h2 { "Últimos lançamentos" }
            ul {
                for (index, episode) in feed.latest.iter().enumerate() {
                    LatestCard {
                        key: "{episode.id}",
                        episode: episode.clone(),
                        play_list: play_list.clone(),
                        index,
                    }
                }
            }
        }

        section { class: "all",
            h2 { "Todos os episódios" }
            table {
                thead {
                    tr {
                        th {}
                        th { "Podcast" }
                        th { "Integrantes" }
                        th { "Data" }
                        th { "Duração" }
                        th {}
                    }
                }
                tbody {
                    for (row, episode) in feed.all.iter().enumerate() {
                        EpisodeRow {
                            key: "{episode.id}",
                            episode: episode.clone(),
                            play_list: play_list.clone(),
                            index: feed.all_index(row),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LatestCard(episode: Episode, play_list: Vec<Episode>, index: usize) -> Element {
    let duration = episode.duration_label();

    rsx! {
        li { class: "latest__card",
            img { class: "latest__thumb", src: "{episode.thumbnail}", alt: "{episode.title}" }
            div { class: "latest__details",
                EpisodeLink { id: episode.id.clone(), title: episode.title.clone() }
                p { "{episode.members}" }
                span { "{episode.published_at}" }
                span { "{duration}" }
            }
            PlayListButton { play_list, index }
        }
    }
}

#[component]
fn EpisodeRow(episode: Episode, play_list: Vec<Episode>, index: usize) -> Element {
    let duration = episode.duration_label();

    rsx! {
        tr {
            td { class: "all__thumb",
                img { src: "{episode.thumbnail}", alt: "{episode.title}" }
            }
            td {
                EpisodeLink { id: episode.id.clone(), title: episode.title.clone() }
            }
            td { "{episode.members}" }
            td { class: "all__date", "{episode.published_at}" }
            td { "{duration}" }
            td {
                PlayListButton { play_list, index }
            }
        }
    }
}

/// Title that opens the episode page.
#[component]
fn EpisodeLink(id: String, title: String) -> Element {
    let mut app_state = use_context::<AppState>();

    rsx! {
        button {
            class: "link",
            r#type: "button",
            onclick: move |_| app_state.navigate(Route::Episode(id.clone())),
            "{title}"
        }
    }
}

/// Replaces the queue with the page's list, starting at `index`.
#[component]
fn PlayListButton(play_list: Vec<Episode>, index: usize) -> Element {
    let app_state = use_context::<AppState>();

    rsx! {
        button {
            class: "play-button",
            r#type: "button",
            title: "Tocar episódio",
            onclick: move |_| app_state.store.play_queue(play_list.clone(), index),
            PlayIcon { size: 16 }
        }
    }
}
