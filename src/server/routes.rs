//! Route handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use switchcast_common::{Error, StreamName};

use super::error::AppError;
use super::AppContext;

/// MPEG-URL media type served for the outward playlist.
pub const PLAYLIST_CONTENT_TYPE: &str = "application/x-mpegURL";

/// Body of `POST /transition`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub name: StreamName,
}

/// Form posted by the media server's publish hooks.
///
/// The media server sends further fields (app, addr, ...) which are ignored.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub name: StreamName,
}

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn playlist(State(ctx): State<AppContext>) -> Response {
    let headers = [
        (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE),
        (header::CACHE_CONTROL, "no-cache"),
    ];

    match ctx.broadcast.serve_playlist().await {
        Ok(text) => (StatusCode::OK, headers, text).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update playlist");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                headers,
                format!("Failed to update playlist\n{}", e),
            )
                .into_response()
        }
    }
}

pub async fn sources(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.broadcast.sources().await)
}

pub async fn status(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.broadcast.status().await)
}

pub async fn transition(
    State(ctx): State<AppContext>,
    Json(req): Json<TransitionRequest>,
) -> Result<&'static str, AppError> {
    let name = require_name(req.name)?;
    ctx.broadcast.transition(&name).await?;
    Ok("OK")
}

pub async fn stream_begin(
    State(ctx): State<AppContext>,
    Form(req): Form<PublishRequest>,
) -> Result<StatusCode, AppError> {
    let name = require_name(req.name)?;
    ctx.broadcast.stream_begin(name).await;
    Ok(StatusCode::OK)
}

pub async fn stream_end(
    State(ctx): State<AppContext>,
    Form(req): Form<PublishRequest>,
) -> Result<StatusCode, AppError> {
    let name = require_name(req.name)?;
    ctx.broadcast.stream_end(&name).await;
    Ok(StatusCode::OK)
}

fn require_name(name: StreamName) -> Result<StreamName, Error> {
    if name.is_blank() {
        return Err(Error::validation("stream name must not be empty"));
    }
    Ok(name)
}
