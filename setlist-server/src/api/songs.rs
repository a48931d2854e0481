//! Song store endpoints
//!
//! - GET    /songs  `{}` → the song store document
//! - POST   /songs  `{title, lyrics}` → add
//! - DELETE /songs  `{title}` → delete
//! - PUT    /songs  `{oldTitle, newTitle}` → rename
//! - PATCH  /songs  `{title, lyrics}` → update lyrics

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use setlist_common::{Command, SongBook};
use tracing::debug;

use super::{success, SuccessResponse};
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SongRequest {
    pub title: String,
    pub lyrics: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub old_title: String,
    pub new_title: String,
}

/// GET /songs
pub async fn list_songs(State(state): State<AppState>) -> Json<SongBook> {
    let songs = state.repo.load_songs().await;
    debug!("Returning {} songs", songs.len());
    Json(songs)
}

/// POST /songs
pub async fn add_song(
    State(state): State<AppState>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    state
        .repo
        .execute(Command::Add {
            title: req.title,
            lyrics: req.lyrics,
        })
        .await?;
    Ok(success())
}

/// DELETE /songs
pub async fn delete_song(
    State(state): State<AppState>,
    payload: Result<Json<TitleRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    state
        .repo
        .execute(Command::Delete { title: req.title })
        .await?;
    Ok(success())
}

/// PUT /songs
pub async fn rename_song(
    State(state): State<AppState>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    state
        .repo
        .execute(Command::Rename {
            old_title: req.old_title,
            new_title: req.new_title,
        })
        .await?;
    Ok(success())
}

/// PATCH /songs
pub async fn update_lyrics(
    State(state): State<AppState>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    state
        .repo
        .execute(Command::UpdateLyrics {
            title: req.title,
            lyrics: req.lyrics,
        })
        .await?;
    Ok(success())
}
