//! Inline SVG icons.

use dioxus::prelude::*;

#[component]
fn Icon(shape: &'static str, #[props(default = 24)] size: u32) -> Element {
    rsx! {
        svg {
            width: "{size}",
            height: "{size}",
            view_box: "0 0 24 24",
            fill: "currentColor",
            path { d: shape }
        }
    }
}

#[component]
pub fn PlayIcon(#[props(default = 24)] size: u32) -> Element {
    rsx! { Icon { shape: "M8 5v14l11-7z", size } }
}

#[component]
pub fn PauseIcon(#[props(default = 24)] size: u32) -> Element {
    rsx! { Icon { shape: "M6 19h4V5H6v14zm8-14v14h4V5h-4z", size } }
}

#[component]
pub fn NextIcon() -> Element {
    rsx! { Icon { shape: "M6 18l8.5-6L6 6v12zM16 6v12h2V6h-2z" } }
}

#[component]
pub fn PreviousIcon() -> Element {
    rsx! { Icon { shape: "M6 6h2v12H6zm3.5 6l8.5 6V6z" } }
}

#[component]
pub fn ShuffleIcon() -> Element {
    rsx! {
        Icon {
            shape: "M10.59 9.17L5.41 4 4 5.41l5.17 5.17 1.42-1.41zM14.5 4l2.04 2.04L4 18.59 5.41 20 17.96 7.46 20 9.5V4h-5.5zm.33 9.41l-1.41 1.41 3.13 3.13L14.5 20H20v-5.5l-2.04 2.04-3.13-3.13z",
        }
    }
}

#[component]
pub fn RepeatIcon() -> Element {
    rsx! { Icon { shape: "M7 7h10v3l4-4-4-4v3H5v6h2V7zm10 10H7v-3l-4 4 4 4v-3h12v-6h-2v4z" } }
}

#[component]
pub fn BackIcon() -> Element {
    rsx! { Icon { shape: "M20 11H7.83l5.59-5.59L12 4l-8 8 8 8 1.41-1.41L7.83 13H20v-2z" } }
}

#[component]
pub fn HeadphonesIcon() -> Element {
    rsx! {
        Icon {
            shape: "M12 3a9 9 0 0 0-9 9v7c0 1.1.9 2 2 2h4v-8H5v-1a7 7 0 0 1 14 0v1h-4v8h4c1.1 0 2-.9 2-2v-7a9 9 0 0 0-9-9z",
        }
    }
}
