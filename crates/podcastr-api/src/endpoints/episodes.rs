//! Episode list and detail endpoints.

use podcastr_core::{Episode, Error, Result};
use tracing::{debug, info};

use crate::{
    parser::{parse_episode, parse_episodes},
    types::{EpisodeQuery, HomeFeed, RawEpisode},
    EpisodesClient,
};

impl EpisodesClient {
    /// Fetch the episode list.
    ///
    /// Records that fail validation are skipped, not reported.
    pub async fn episodes(&self, query: &EpisodeQuery) -> Result<Vec<Episode>> {
        let url = self.endpoint(&["episodes"])?;
        let raw: Vec<serde_json::Value> = self
            .get(url, &query.params())
            .await
            .map_err(|e| match e {
                Error::Parse(msg) => Error::Api(format!("Unexpected episode list payload: {msg}")),
                other => other,
            })?;

        let received = raw.len();
        let episodes = parse_episodes(raw, self.locale);
        debug!("Episode list: {received} records, {} valid", episodes.len());
        Ok(episodes)
    }

    /// Fetch a single episode, including its description.
    pub async fn episode(&self, id: &str) -> Result<Episode> {
        if id.trim().is_empty() {
            return Err(Error::InvalidArgument("empty episode id".to_string()));
        }

        let url = self.endpoint(&["episodes", id])?;
        let raw: RawEpisode = self.get(url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                Error::NotFound(id.to_string())
            } else {
                e
            }
        })?;

        parse_episode(raw, self.locale)
    }

    /// Fetch the newest `limit` episodes and split them for the home page.
    pub async fn home_feed(&self, limit: u32, latest_count: usize) -> Result<HomeFeed> {
        let episodes = self.episodes(&EpisodeQuery::latest(limit)).await?;
        let feed = HomeFeed::split(episodes, latest_count);
        info!(
            "Home feed loaded: {} latest, {} more",
            feed.latest.len(),
            feed.all.len()
        );
        Ok(feed)
    }
}
