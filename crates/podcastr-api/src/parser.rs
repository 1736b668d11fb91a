//! Validation of raw API records into [`Episode`]s.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime};
use podcastr_core::{Duration, Episode, Error, Result};
use serde_json::Value;
use tracing::warn;

use crate::types::RawEpisode;

/// Display format for publish dates, e.g. `8 jan 21`.
pub const PUBLISHED_FORMAT: &str = "%-d %b %y";

/// Validate one raw record.
///
/// The id and the media URL are required. Missing text fields become empty
/// strings and a malformed duration becomes zero.
pub fn parse_episode(raw: RawEpisode, locale: Locale) -> Result<Episode> {
    let id = raw
        .id
        .as_ref()
        .map(crate::types::RawScalar::as_text)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Parse("episode without id".to_string()))?;

    let file = raw.file.unwrap_or_default();
    let url = file
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::Parse(format!("episode {id} has no media url")))?;

    let duration = match file.duration.as_ref() {
        Some(value) => value.as_seconds().unwrap_or_else(|| {
            warn!("Episode {id} has malformed duration {value:?}, using 0");
            0
        }),
        None => 0,
    };

    let published_at = raw
        .published_at
        .as_deref()
        .map(|date| format_published(date, locale))
        .unwrap_or_default();

    Ok(Episode {
        id,
        title: raw.title.unwrap_or_default(),
        members: raw.members.unwrap_or_default(),
        thumbnail: raw.thumbnail.unwrap_or_default(),
        duration: Duration::from_seconds(duration),
        url,
        published_at,
        description: raw.description,
    })
}

/// Validate a list, dropping records that fail validation.
///
/// Items are decoded one by one so a record of the wrong shape only costs
/// itself.
pub fn parse_episodes(items: Vec<Value>, locale: Locale) -> Vec<Episode> {
    items
        .into_iter()
        .filter_map(|item| {
            let parsed = serde_json::from_value::<RawEpisode>(item)
                .map_err(Error::from)
                .and_then(|raw| parse_episode(raw, locale));
            match parsed {
                Ok(episode) => Some(episode),
                Err(e) => {
                    warn!("Skipping episode record: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Format a publish timestamp once for display.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and a bare
/// date. Anything else is returned unchanged.
pub fn format_published(raw: &str, locale: Locale) -> String {
    parse_date(raw).map_or_else(
        || raw.to_string(),
        |date| date.format_localized(PUBLISHED_FORMAT, locale).to_string(),
    )
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{RawFile, RawScalar};
    use serde_json::json;

    fn raw(id: &str, url: &str) -> RawEpisode {
        RawEpisode {
            id: Some(RawScalar::Text(id.to_string())),
            title: Some("Faladev #30 | Como é o trabalho remoto?".to_string()),
            members: Some("Diego e Richard".to_string()),
            thumbnail: Some("https://cdn.example.com/thumb.jpg".to_string()),
            description: None,
            published_at: Some("2021-01-08 16:00:00".to_string()),
            file: Some(RawFile {
                url: Some(url.to_string()),
                mime_type: Some("audio/x-m4a".to_string()),
                duration: Some(RawScalar::Text("3981".to_string())),
            }),
        }
    }

    #[test]
    fn test_parse_valid_episode() {
        let episode = parse_episode(raw("ep-1", "https://cdn.example.com/a.m4a"), Locale::pt_BR)
            .unwrap();
        assert_eq!(episode.id, "ep-1");
        assert_eq!(episode.duration.as_seconds(), 3981);
        assert_eq!(episode.url, "https://cdn.example.com/a.m4a");
        assert_eq!(episode.published_at, "8 jan 21");
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let result = parse_episode(raw("ep-1", "  "), Locale::pt_BR);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut record = raw("ep-1", "https://cdn.example.com/a.m4a");
        record.id = None;
        assert!(parse_episode(record, Locale::pt_BR).is_err());
    }

    #[test]
    fn test_numeric_id_and_bad_duration() {
        let mut record = raw("x", "https://cdn.example.com/a.m4a");
        record.id = Some(RawScalar::Number(serde_json::Number::from(7)));
        record.file.as_mut().unwrap().duration = Some(RawScalar::Text("n/a".to_string()));

        let episode = parse_episode(record, Locale::pt_BR).unwrap();
        assert_eq!(episode.id, "7");
        assert_eq!(episode.duration.as_seconds(), 0);
    }

    #[test]
    fn test_parse_episodes_skips_invalid() {
        let episodes = parse_episodes(
            vec![
                json!({ "id": "a", "file": { "url": "https://cdn.example.com/a.m4a" } }),
                json!({ "id": "", "file": { "url": "https://cdn.example.com/b.m4a" } }),
                json!("not a record"),
                json!({ "id": "d", "file": { "url": 5 } }),
                json!({ "id": "e", "file": { "url": "https://cdn.example.com/e.m4a" } }),
            ],
            Locale::pt_BR,
        );
        let ids: Vec<_> = episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "e"]);
    }

    #[test]
    fn test_wrong_typed_text_fields_are_defaulted() {
        let record: RawEpisode = serde_json::from_value(json!({
            "id": "odd",
            "title": 42,
            "members": ["Diego"],
            "thumbnail": null,
            "published_at": false,
            "file": { "url": "https://cdn.example.com/odd.m4a", "type": 1, "duration": {} }
        }))
        .unwrap();

        let episode = parse_episode(record, Locale::pt_BR).unwrap();
        assert_eq!(episode.title, "");
        assert_eq!(episode.members, "");
        assert_eq!(episode.published_at, "");
        assert_eq!(episode.duration.as_seconds(), 0);
        assert_eq!(episode.url, "https://cdn.example.com/odd.m4a");
    }

    #[test]
    fn test_format_published_variants() {
        assert_eq!(format_published("2021-02-15T10:00:00Z", Locale::pt_BR), "15 fev 21");
        assert_eq!(format_published("2021-12-01", Locale::pt_BR), "1 dez 21");
        assert_eq!(format_published("2021-03-04 08:00:00", Locale::en_US), "4 Mar 21");
        assert_eq!(format_published("yesterday", Locale::pt_BR), "yesterday");
    }

    #[test]
    fn test_deserialize_api_record() {
        let json = r#"{
            "id": "a-importancia-da-contribuicao-em-open-source",
            "title": "A importância da contribuição em Open Source",
            "members": "Diego Fernandes, João Pedro, Diego Haz e Bruno Lemos",
            "published_at": "2021-01-22 19:00:00",
            "thumbnail": "https://cdn.example.com/opensource.jpg",
            "description": "<p>Nesse episódio</p>",
            "file": {
                "url": "https://cdn.example.com/opensource.m4a",
                "type": "audio/x-m4a",
                "duration": 3340
            }
        }"#;
        let record: RawEpisode = serde_json::from_str(json).unwrap();
        let episode = parse_episode(record, Locale::pt_BR).unwrap();
        assert_eq!(episode.duration_label(), "00:55:40");
        assert_eq!(episode.published_at, "22 jan 21");
        assert_eq!(episode.description.as_deref(), Some("<p>Nesse episódio</p>"));
    }
}
