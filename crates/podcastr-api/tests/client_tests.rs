//! Episode client tests against a mock API server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::Locale;
use podcastr_api::{ClientConfig, EpisodeQuery, EpisodesClient};
use podcastr_core::Error;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: &str, published_at: &str, duration: Value) -> Value {
    json!({
        "id": id,
        "title": format!("Episode {id}"),
        "members": "Diego Fernandes",
        "published_at": published_at,
        "thumbnail": format!("https://cdn.example.com/{id}.jpg"),
        "description": "<p>Show notes</p>",
        "file": {
            "url": format!("https://cdn.example.com/{id}.m4a"),
            "type": "audio/x-m4a",
            "duration": duration
        }
    })
}

fn client_for(server: &MockServer) -> EpisodesClient {
    EpisodesClient::with_config(ClientConfig {
        base_url: server.uri(),
        retry_base_delay: Duration::from_millis(10),
        locale: Locale::pt_BR,
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_sends_query_and_parses_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .and(query_param("_limit", "12"))
        .and(query_param("_sort", "published_at"))
        .and(query_param("_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record("newest", "2021-01-22 19:00:00", json!(3340)),
            record("older", "2021-01-08 16:00:00", json!("3981")),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let episodes = client.episodes(&EpisodeQuery::latest(12)).await.unwrap();

    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].id, "newest");
    assert_eq!(episodes[0].published_at, "22 jan 21");
    assert_eq!(episodes[1].duration.as_seconds(), 3981);
    assert_eq!(episodes[1].url, "https://cdn.example.com/older.m4a");
}

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record("good", "2021-01-22 19:00:00", json!(10)),
            { "id": "no-file", "title": "Missing file" },
        ])))
        .mount(&server)
        .await;

    let episodes = client_for(&server)
        .episodes(&EpisodeQuery::latest(12))
        .await
        .unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].id, "good");
}

#[tokio::test]
async fn test_wrong_typed_record_does_not_sink_the_list() {
    let server = MockServer::start().await;
    let mut bad_title = record("bad-title", "2021-01-20 19:00:00", json!(30));
    bad_title["title"] = json!(42);
    let mut bad_url = record("bad-url", "2021-01-19 19:00:00", json!(30));
    bad_url["file"]["url"] = json!(5);
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record("good", "2021-01-22 19:00:00", json!(10)),
            bad_title,
            bad_url,
            7,
        ])))
        .mount(&server)
        .await;

    let episodes = client_for(&server)
        .episodes(&EpisodeQuery::latest(12))
        .await
        .unwrap();
    let ids: Vec<_> = episodes.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["good", "bad-title"]);
    assert_eq!(episodes[1].title, "");
}

#[tokio::test]
async fn test_home_feed_splits_latest_two() {
    let server = MockServer::start().await;
    let records: Vec<_> = (0..5)
        .map(|i| record(&format!("ep-{i}"), "2021-01-22 19:00:00", json!(60)))
        .collect();
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(records)))
        .mount(&server)
        .await;

    let feed = client_for(&server).home_feed(12, 2).await.unwrap();
    assert_eq!(feed.latest.len(), 2);
    assert_eq!(feed.all.len(), 3);
    assert_eq!(feed.play_list()[feed.all_index(0)].id, "ep-2");
}

#[tokio::test]
async fn test_detail_includes_description() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes/open-source"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record("open-source", "2021-01-22 19:00:00", json!(3340))),
        )
        .mount(&server)
        .await;

    let episode = client_for(&server).episode("open-source").await.unwrap();
    assert_eq!(episode.title, "Episode open-source");
    assert_eq!(episode.description.as_deref(), Some("<p>Show notes</p>"));
    assert_eq!(episode.duration_label(), "00:55:40");
}

#[tokio::test]
async fn test_detail_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).episode("missing").await;
    assert!(matches!(result, Err(Error::NotFound(id)) if id == "missing"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record(
            "late",
            "2021-01-22 19:00:00",
            json!(1)
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let episodes = client_for(&server)
        .episodes(&EpisodeQuery::latest(12))
        .await
        .unwrap();
    assert_eq!(episodes[0].id, "late");
}

#[tokio::test]
async fn test_responses_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record(
            "cached",
            "2021-01-22 19:00:00",
            json!(1)
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.episodes(&EpisodeQuery::latest(12)).await.unwrap();
    let again = client.episodes(&EpisodeQuery::latest(12)).await.unwrap();

    assert_eq!(again[0].id, "cached");
    assert_eq!(client.cache_size(), 1);
}

#[tokio::test]
async fn test_invalid_payload_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let result = client_for(&server).episodes(&EpisodeQuery::latest(12)).await;
    assert!(matches!(result, Err(Error::Api(_))));
}
