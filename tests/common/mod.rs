//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires an in-memory [`MemorySource`] into a
//! full [`AppContext`] so route tests can script upstream playlists without a
//! network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;

use switchcast::config::Config;
use switchcast::server::{create_router, AppContext};
use switchcast::source::{playlist_url, PlaylistSource};
use switchcast_common::{Error, Result};

/// Upstream playlists served from memory, keyed by URL.
#[derive(Default)]
pub struct MemorySource {
    bodies: Mutex<HashMap<String, String>>,
    base_url: String,
}

impl MemorySource {
    pub fn new(base_url: &str) -> Self {
        Self {
            bodies: Mutex::new(HashMap::new()),
            base_url: base_url.to_string(),
        }
    }

    /// Publish `body` as the playlist of stream `name`.
    pub fn set(&self, name: &str, body: impl Into<String>) {
        let url = playlist_url(&self.base_url, &name.into());
        self.bodies.lock().unwrap().insert(url, body.into());
    }

    pub fn remove(&self, name: &str) {
        let url = playlist_url(&self.base_url, &name.into());
        self.bodies.lock().unwrap().remove(&url);
    }
}

#[async_trait]
impl PlaylistSource for MemorySource {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::upstream(url, "HTTP 404 Not Found"))
    }
}

/// Test harness wrapping an [`AppContext`] backed by a [`MemorySource`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub source: Arc<MemorySource>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let source = Arc::new(MemorySource::new(&config.upstream.playlist_base_url));
        let ctx = AppContext::new(config, source.clone());
        Self { ctx, source }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }
}

/// Build an upstream snapshot with the given media sequence and segments.
pub fn snapshot(sequence: i64, target_duration: u32, segments: &[&str]) -> String {
    let mut text = format!(
        "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:{}\n#EXT-X-MEDIA-SEQUENCE:{}\n",
        target_duration, sequence
    );
    for segment in segments {
        text.push_str(&format!("#EXTINF:2.000,\n{}\n", segment));
    }
    text
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to get response body as string
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
