//! Top bar with the logo, tagline and today's date.

use chrono::Local;
use dioxus::prelude::*;

use crate::state::{AppState, Route};

/// Weekday, day and month, e.g. `qui, 8 abril`.
const DATE_FORMAT: &str = "%a, %-d %B";

#[component]
pub fn Header() -> Element {
    let mut app_state = use_context::<AppState>();
    let today = Local::now()
        .format_localized(DATE_FORMAT, app_state.locale())
        .to_string();

    rsx! {
        header { class: "header",
            button {
                class: "header__logo",
                r#type: "button",
                onclick: move |_| app_state.navigate(Route::Home),
                "Podcastr"
            }
            p { class: "header__tagline", "O melhor para você ouvir, sempre" }
            span { class: "header__date", "{today}" }
        }
    }
}
