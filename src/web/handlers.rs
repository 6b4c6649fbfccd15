//! HTTP request handlers.

use super::AppState;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Raw page parameter; anything that is not a positive integer falls
    /// back to page 1.
    pub page: Option<String>,
}

/// `GET /stats/{website}?page=N`
///
/// The path segment is a hostname; it is combined with the `https://` scheme
/// prefix before lookup, so it must match a configured target exactly.
pub async fn handle_get_stats(
    State(state): State<AppState>,
    Path(website): Path<String>,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
    let url = format!("https://{}", website);

    match state.monitor.query_page(&url, query.page.as_deref()) {
        Some(page) => Json(page).into_response(),
        None => (StatusCode::NOT_FOUND, "stats for url not found").into_response(),
    }
}
