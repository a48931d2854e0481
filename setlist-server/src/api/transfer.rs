//! Import and export of the whole library
//!
//! Both shapes of the transfer document are accepted on import. Export
//! writes the bundle shape unless `?format=legacy` is given.

use axum::{extract::Query, extract::State, Json};
use serde::{Deserialize, Serialize};
use setlist_common::{ExportFormat, TransferDocument};

use crate::{ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    /// Songs in the song store after the import
    pub songs: usize,
    /// Entries in the order store after the import
    pub entries: usize,
}

/// GET /songs/export
pub async fn export_songs(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Json<TransferDocument>> {
    Ok(Json(state.repo.export(query.format).await?))
}

/// POST /songs/import
///
/// The body is read as text so an unrecognised shape reports the expected
/// shapes rather than a serde message.
pub async fn import_songs(State(state): State<AppState>, body: String) -> ApiResult<Json<ImportResponse>> {
    let document = TransferDocument::parse(&body)?;
    let library = state.repo.import(document).await?;
    Ok(Json(ImportResponse {
        success: true,
        songs: library.songs.len(),
        entries: library.order.len(),
    }))
}
