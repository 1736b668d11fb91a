//! Player panel: current episode, progress slider and transport buttons.

use dioxus::prelude::*;
use podcastr_core::{format_duration, PlayerSnapshot};

use super::icons::{
    HeadphonesIcon, NextIcon, PauseIcon, PlayIcon, PreviousIcon, RepeatIcon, ShuffleIcon,
};
use crate::services::AudioService;
use crate::state::AppState;

#[component]
pub fn Player() -> Element {
    let app_state = use_context::<AppState>();
    let audio = use_context::<Signal<AudioService>>();
    let mut progress = app_state.progress;

    let snapshot = app_state.player.read().clone();
    let elapsed = *progress.read();
    let duration = *app_state.duration.read();
    let episode = snapshot.current_episode().cloned();
    let small_title = compact_title(&snapshot).map(str::to_owned);

    let elapsed_label = format_duration(elapsed);
    let duration_label = format_duration(duration);

    let store = app_state.store;
    let (shuffle, previous, play, next, repeat) =
        (store.clone(), store.clone(), store.clone(), store.clone(), store);

    rsx! {
        div { class: "player",
            header { class: "player__header",
                HeadphonesIcon {}
                strong { "Tocando agora" }
            }

            if let Some(episode) = episode {
                div { class: "player__current",
                    img { src: "{episode.thumbnail}", alt: "{episode.title}" }
                    strong { "{episode.title}" }
                    span { "{episode.members}" }
                }
            } else {
                div { class: "player__empty",
                    strong { "Selecione um podcast para ouvir" }
                }
            }

            footer { class: if snapshot.has_episode() { "player__footer" } else { "player__footer player__footer--empty" },
                div { class: "player__compact-title",
                    if let Some(title) = small_title {
                        strong { "{title}" }
                    }
                }
                div { class: "player__progress",
                    span { "{elapsed_label}" }
                    if snapshot.has_episode() {
                        input {
                            class: "player__slider",
                            r#type: "range",
                            min: "0",
                            max: "{duration}",
                            value: "{elapsed}",
                            oninput: move |evt| {
                                if let Ok(target) = evt.value().parse::<f64>() {
                                    let position = audio.read().seek(target);
                                    progress.set(position);
                                }
                            },
                        }
                    } else {
                        div { class: "player__slider player__slider--empty" }
                    }
                    span { "{duration_label}" }
                }

                div { class: "player__buttons",
                    button {
                        r#type: "button",
                        title: "Embaralhar",
                        class: if snapshot.is_shuffling { "is-active" },
                        disabled: !snapshot.can_toggle_shuffle(),
                        onclick: move |_| shuffle.toggle_shuffle(),
                        ShuffleIcon {}
                    }
                    button {
                        r#type: "button",
                        title: "Voltar",
                        disabled: !snapshot.can_play_previous(),
                        onclick: move |_| previous.play_previous(),
                        PreviousIcon {}
                    }
                    button {
                        r#type: "button",
                        title: if snapshot.is_playing { "Pausar" } else { "Tocar" },
                        class: "player__play",
                        disabled: !snapshot.can_control(),
                        onclick: move |_| play.toggle_play(),
                        if snapshot.is_playing {
                            PauseIcon { size: 32 }
                        } else {
                            PlayIcon { size: 32 }
                        }
                    }
                    button {
                        r#type: "button",
                        title: "Pular",
                        disabled: !snapshot.can_play_next(),
                        onclick: move |_| next.play_next(),
                        NextIcon {}
                    }
                    button {
                        r#type: "button",
                        title: "Repetir",
                        class: if snapshot.is_looping { "is-active" },
                        disabled: !snapshot.can_control(),
                        onclick: move |_| repeat.toggle_loop(),
                        RepeatIcon {}
                    }
                }
            }
        }
    }
}

/// Title shown above the slider when the window is too narrow for the
/// episode card.
fn compact_title(snapshot: &PlayerSnapshot) -> Option<&str> {
    snapshot
        .current_episode()
        .map(|e| e.title.as_str())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcastr_core::{Episode, PlayerStore};

    #[test]
    fn test_compact_title_follows_current_episode() {
        let store = PlayerStore::new();
        assert_eq!(compact_title(&store.snapshot()), None);

        store.play_queue(
            vec![
                Episode::new("a", "Faladev #30"),
                Episode::new("b", "Como virar tech lead"),
            ],
            1,
        );
        assert_eq!(compact_title(&store.snapshot()), Some("Como virar tech lead"));

        store.play(Episode::new("c", ""));
        assert_eq!(compact_title(&store.snapshot()), None);
    }
}
