//! setlist-server library - HTTP front end for the setlist
//!
//! Routes:
//! - `/songs`: song store reads and mutations
//! - `/songs/order`: reconciled order, reorder, hide toggle, move to top,
//!   display ordinals
//! - `/songs/export`, `/songs/import`: transfer documents
//! - `/health`, `/build_info`

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use setlist_common::Repository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Access to the song and order documents
    pub repo: Repository,
    /// When this process started serving
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let songs = Router::new()
        .route(
            "/songs",
            get(api::list_songs)
                .post(api::add_song)
                .delete(api::delete_song)
                .put(api::rename_song)
                .patch(api::update_lyrics),
        )
        .route("/songs/order", get(api::get_order).post(api::save_order))
        .route("/songs/order/toggle-hidden", post(api::toggle_hidden))
        .route("/songs/order/move-to-top", post(api::move_to_top))
        .route("/songs/order/ordinals", get(api::get_ordinals))
        .route("/songs/export", get(api::export_songs))
        .route("/songs/import", post(api::import_songs));

    Router::new()
        .merge(songs)
        .merge(api::health_routes())
        .route("/build_info", get(api::get_build_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
