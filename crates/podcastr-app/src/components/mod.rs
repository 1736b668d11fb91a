//! UI components.

mod episode;
mod header;
mod home;
mod icons;
mod player;

pub use episode::EpisodePage;
pub use header::Header;
pub use home::Home;
pub use player::Player;
