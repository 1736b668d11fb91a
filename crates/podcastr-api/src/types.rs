//! Request parameters, raw response records, and the home feed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use podcastr_core::Episode;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query for the episode list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeQuery {
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: SortOrder,
}

impl EpisodeQuery {
    /// Most recently published first.
    pub fn latest(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            sort: Some("published_at".to_string()),
            order: SortOrder::Desc,
        }
    }

    /// Query string pairs in the API's `_name` convention.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(limit) = self.limit {
            params.push(("_limit", limit.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("_sort", sort.clone()));
            params.push(("_order", self.order.as_str().to_string()));
        }
        params
    }
}

impl Default for EpisodeQuery {
    fn default() -> Self {
        Self::latest(12)
    }
}

/// A scalar the API sends either as a JSON string or number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(serde_json::Number),
}

impl RawScalar {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// Non-negative number, fractional part dropped.
    pub fn as_seconds(&self) -> Option<u64> {
        let value = match self {
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Number(n) => n.as_f64()?,
        };
        (value.is_finite() && value >= 0.0).then(|| value.floor() as u64)
    }
}

/// Accept any JSON for an optional field, keeping it only when it has the
/// expected shape. A wrong-typed field reads as missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Episode record as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEpisode {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub members: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub file: Option<RawFile>,
}

/// Nested media file of an episode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFile {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<RawScalar>,
}

/// Home page data: the newest releases and everything after them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeFeed {
    pub latest: Vec<Episode>,
    pub all: Vec<Episode>,
}

impl HomeFeed {
    /// Split an already sorted list after the first `latest_count` entries.
    pub fn split(mut episodes: Vec<Episode>, latest_count: usize) -> Self {
        let rest = episodes.split_off(latest_count.min(episodes.len()));
        Self {
            latest: episodes,
            all: rest,
        }
    }

    /// The play list used by every play button on the home page.
    pub fn play_list(&self) -> Vec<Episode> {
        self.latest.iter().chain(&self.all).cloned().collect()
    }

    /// Position of row `row` of [`Self::all`] inside [`Self::play_list`].
    pub fn all_index(&self, row: usize) -> usize {
        row + self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty() && self.all.is_empty()
    }
}
