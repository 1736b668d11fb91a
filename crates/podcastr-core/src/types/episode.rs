//! Episode type representing a single podcast episode.

use serde::{Deserialize, Serialize};

use super::{format_duration, Duration};

/// A single podcast episode, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    /// Identifier, unique within a queue.
    pub id: String,
    /// Episode title.
    pub title: String,
    /// Hosts and guests, free text.
    pub members: String,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Episode length.
    pub duration: Duration,
    /// Playable media URL.
    pub url: String,
    /// Publish date, already formatted for display.
    pub published_at: String,
    /// HTML description (only present on the detail endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Episode {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            members: String::new(),
            thumbnail: String::new(),
            duration: Duration::default(),
            url: String::new(),
            published_at: String::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_members(mut self, members: impl Into<String>) -> Self {
        self.members = members.into();
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Duration rendered as `HH:MM:SS`.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration.as_seconds())
    }
}
