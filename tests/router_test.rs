//! Route-level tests driven through `tower::ServiceExt::oneshot`.

mod common;

use axum::http::{header, StatusCode};
use common::{body_to_string, get, post_form, post_json, snapshot, TestHarness};
use tower::ServiceExt;

async fn publish(h: &TestHarness, name: &str) {
    let resp = h
        .router()
        .oneshot(post_form("/stream/begin", &format!("app=live&name={}", name)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn transition(h: &TestHarness, name: &str) -> (StatusCode, String) {
    let resp = h
        .router()
        .oneshot(post_json("/transition", serde_json::json!({ "name": name })))
        .await
        .unwrap();
    let status = resp.status();
    (status, body_to_string(resp.into_body()).await)
}

async fn playlist(h: &TestHarness) -> (StatusCode, String) {
    let resp = h.router().oneshot(get("/playlist.m3u8")).await.unwrap();
    let status = resp.status();
    (status, body_to_string(resp.into_body()).await)
}

#[tokio::test]
async fn health_returns_ok() {
    let h = TestHarness::new();
    let resp = h.router().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_playlist_before_any_transition() {
    let h = TestHarness::new();
    let resp = h.router().oneshot(get("/playlist.m3u8")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/x-mpegURL"
    );
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(
        body_to_string(resp.into_body()).await,
        "#EXTM3U\n#EXT-X-ENDLIST\n"
    );
}

#[tokio::test]
async fn sources_lists_published_streams_in_order() {
    let h = TestHarness::new();
    publish(&h, "studio").await;
    publish(&h, "field").await;
    publish(&h, "studio").await;

    let resp = h.router().oneshot(get("/sources")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let names: Vec<String> = serde_json::from_str(&body_to_string(resp.into_body()).await).unwrap();
    assert_eq!(names, vec!["studio", "field"]);
}

#[tokio::test]
async fn stream_begin_rejects_blank_name() {
    let h = TestHarness::new();
    let resp = h
        .router()
        .oneshot(post_form("/stream/begin", "name="))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: serde_json::Value =
        serde_json::from_str(&body_to_string(resp.into_body()).await).unwrap();
    assert_eq!(json["code"], "validation_error");
}

#[tokio::test]
async fn transition_to_unknown_source_is_404() {
    let h = TestHarness::new();
    let (status, body) = transition(&h, "ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "not_found");
    assert_eq!(json["error"], "source not found: ghost");
}

#[tokio::test]
async fn transition_starts_live_playlist() {
    let h = TestHarness::new();
    h.source.set("studio", snapshot(40, 4, &["s40.ts", "s41.ts", "s42.ts"]));
    publish(&h, "studio").await;

    let (status, body) = transition(&h, "studio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, text) = playlist(&h).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("#EXTM3U\n"));
    assert!(text.contains("#EXT-X-TARGETDURATION:4\n"));
    assert!(text.contains("#EXTINF:2.000,\nhls/s40.ts\n"));
    assert!(text.ends_with("hls/s42.ts\n"));
    assert!(!text.contains("#EXT-X-ENDLIST"));
}

#[tokio::test]
async fn transition_upstream_missing_is_502() {
    let h = TestHarness::new();
    publish(&h, "studio").await;

    let (status, body) = transition(&h, "studio").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "upstream_error");
}

#[tokio::test]
async fn transition_malformed_upstream_is_500() {
    let h = TestHarness::new();
    h.source.set("studio", "<html>502 Bad Gateway</html>");
    publish(&h, "studio").await;

    let (status, body) = transition(&h, "studio").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "playlist_error");
}

#[tokio::test]
async fn switching_sources_inserts_discontinuity() {
    let h = TestHarness::new();
    h.source.set("studio", snapshot(10, 2, &["s10.ts", "s11.ts"]));
    h.source.set(
        "field",
        snapshot(3, 2, &["f1.ts", "f2.ts", "f3.ts", "f4.ts", "f5.ts", "f6.ts"]),
    );
    publish(&h, "studio").await;
    publish(&h, "field").await;

    assert_eq!(transition(&h, "studio").await.0, StatusCode::OK);
    assert_eq!(transition(&h, "field").await.0, StatusCode::OK);

    let (_, text) = playlist(&h).await;
    assert!(text.contains("#EXT-X-MEDIA-SEQUENCE:2\n"));
    assert!(text.contains(
        "hls/s11.ts\n#EXT-X-DISCONTINUITY\n#EXTINF:2.000,\nhls/f3.ts\n"
    ));
    assert!(!text.contains("f2.ts"));
    assert!(text.ends_with("hls/f6.ts\n"));
}

#[tokio::test]
async fn discontinuity_tags_can_be_disabled() {
    let mut config = switchcast::config::Config::default();
    config.playlist.discontinuity_tags = false;
    config.playlist.segment_prefix = "/media/".into();
    let h = TestHarness::with_config(config);
    h.source.set("studio", snapshot(1, 2, &["s1.ts"]));
    h.source.set("field", snapshot(1, 2, &["f1.ts"]));
    publish(&h, "studio").await;
    publish(&h, "field").await;

    transition(&h, "studio").await;
    transition(&h, "field").await;

    let (_, text) = playlist(&h).await;
    assert!(text.contains("/media/s1.ts\n#EXTINF:2.000,\n/media/f1.ts\n"));
    assert!(!text.contains("#EXT-X-DISCONTINUITY"));
}

#[tokio::test]
async fn ending_last_stream_terminates_playlist() {
    let h = TestHarness::new();
    h.source.set("studio", snapshot(1, 2, &["s1.ts"]));
    publish(&h, "studio").await;
    transition(&h, "studio").await;

    let resp = h
        .router()
        .oneshot(post_form("/stream/end", "name=studio"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, text) = playlist(&h).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.ends_with("hls/s1.ts\n#EXT-X-ENDLIST\n"));
}

#[tokio::test]
async fn ending_unknown_stream_is_ok() {
    let h = TestHarness::new();
    let resp = h
        .router()
        .oneshot(post_form("/stream/end", "name=nobody"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn status_reports_broadcast() {
    let h = TestHarness::new();
    h.source.set("studio", snapshot(7, 6, &["s7.ts", "s8.ts"]));
    publish(&h, "studio").await;
    transition(&h, "studio").await;

    let resp = h.router().oneshot(get("/status")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_to_string(resp.into_body()).await).unwrap();

    assert_eq!(json["current"], "studio");
    assert_eq!(json["streaming"], true);
    assert_eq!(json["outward_sequence"], 1);
    assert_eq!(json["entries"], 2);
    assert_eq!(json["target_duration_secs"], 6.0);
    assert_eq!(json["sources"], serde_json::json!(["studio"]));
}

#[tokio::test(start_paused = true)]
async fn stale_playlist_is_refreshed_on_request() {
    let h = TestHarness::new();
    h.source.set("studio", snapshot(1, 2, &["s1.ts", "s2.ts"]));
    publish(&h, "studio").await;
    transition(&h, "studio").await;

    h.source.set("studio", snapshot(2, 2, &["s2.ts", "s3.ts"]));
    let (_, text) = playlist(&h).await;
    assert!(!text.contains("s3.ts"));

    tokio::time::advance(std::time::Duration::from_secs(2)).await;
    let (_, text) = playlist(&h).await;
    assert!(text.ends_with("hls/s2.ts\n#EXTINF:2.000,\nhls/s3.ts\n"));
    assert!(text.contains("#EXT-X-MEDIA-SEQUENCE:2\n"));
}

#[tokio::test(start_paused = true)]
async fn refresh_failure_reports_500_text() {
    let h = TestHarness::new();
    h.source.set("studio", snapshot(1, 2, &["s1.ts"]));
    publish(&h, "studio").await;
    transition(&h, "studio").await;

    h.source.remove("studio");
    tokio::time::advance(std::time::Duration::from_secs(2)).await;

    let resp = h.router().oneshot(get("/playlist.m3u8")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_string(resp.into_body()).await;
    assert!(body.starts_with("Failed to update playlist\n"));
    assert!(body.contains("Upstream error"));
}
