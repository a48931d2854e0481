//! Order store endpoints
//!
//! `GET /songs/order` always answers with the reconciled order and writes a
//! repaired order back. `POST /songs/order` replaces the order wholesale; the
//! only check is that the body is a JSON array of entries.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use setlist_common::display::{display_rows, DisplayRow, DragState, RowFilter};
use setlist_common::{Command, Error, OrderEntry};

use super::{success, songs::TitleRequest, SuccessResponse};
use crate::{ApiResult, AppState};

/// GET /songs/order
pub async fn get_order(State(state): State<AppState>) -> ApiResult<Json<Vec<OrderEntry>>> {
    Ok(Json(state.repo.order().await?))
}

/// POST /songs/order
pub async fn save_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(body) = payload?;
    if !body.is_array() {
        return Err(Error::InvalidPayload("Invalid order format".to_string()).into());
    }
    let order: Vec<OrderEntry> = serde_json::from_value(body)
        .map_err(|e| Error::InvalidPayload(format!("Invalid order entry: {}", e)))?;

    state.repo.execute(Command::Reorder { order }).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: Some("Order saved successfully"),
    }))
}

/// POST /songs/order/toggle-hidden
pub async fn toggle_hidden(
    State(state): State<AppState>,
    payload: Result<Json<TitleRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    state
        .repo
        .execute(Command::ToggleHidden { title: req.title })
        .await?;
    Ok(success())
}

/// POST /songs/order/move-to-top
pub async fn move_to_top(
    State(state): State<AppState>,
    payload: Result<Json<TitleRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    state
        .repo
        .execute(Command::MoveToTop { title: req.title })
        .await?;
    Ok(success())
}

/// Query parameters for the ordinals endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdinalsQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub hide_hidden: bool,
    pub drag_source: Option<usize>,
    pub drag_target: Option<usize>,
}

impl OrdinalsQuery {
    /// A drag only counts when both ends are given
    fn drag(&self) -> Option<DragState> {
        match (self.drag_source, self.drag_target) {
            (Some(source), Some(target)) => Some(DragState { source, target }),
            _ => None,
        }
    }
}

/// GET /songs/order/ordinals
pub async fn get_ordinals(
    State(state): State<AppState>,
    Query(query): Query<OrdinalsQuery>,
) -> ApiResult<Json<Vec<DisplayRow>>> {
    let order = state.repo.order().await?;
    let drag = query.drag();
    let filter = RowFilter {
        search: query.search,
        hide_hidden: query.hide_hidden,
    };
    Ok(Json(display_rows(&order, &filter, drag)))
}
