//! HTTP API handlers for setlist-server

pub mod buildinfo;
pub mod health;
pub mod order;
pub mod songs;
pub mod transfer;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use order::{get_order, get_ordinals, move_to_top, save_order, toggle_hidden};
pub use songs::{add_song, delete_song, list_songs, rename_song, update_lyrics};
pub use transfer::{export_songs, import_songs};

use axum::Json;
use serde::Serialize;

/// Body returned by successful mutations
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

pub(crate) fn success() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        success: true,
        message: None,
    })
}
