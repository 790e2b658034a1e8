use crate::{error::Error, state::AppState, util::extract::Query};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use libtour::{category, empty_string_as_none, location::Location};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_locations))
        .route("/refresh", post(refresh_locations))
        .route("/{id}", get(show_location))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    /// substring search over title/description/address
    #[serde(default, deserialize_with = "empty_string_as_none")]
    q: Option<String>,
    /// comma-joined category ids, e.g. "1,3,5"
    #[serde(default, deserialize_with = "empty_string_as_none")]
    categories: Option<String>,
}

async fn list_locations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Location>> {
    let selected = params.categories.as_deref().map(category::parse_id_list);
    let locations = state.locations.read().await;
    let matching = locations
        .iter()
        .filter(|loc| {
            selected
                .as_ref()
                .is_none_or(|cats| cats.contains(&loc.category_kind()))
                && params.q.as_deref().is_none_or(|q| loc.matches_query(q))
        })
        .cloned()
        .collect();
    Json(matching)
}

async fn show_location(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Location>, Error> {
    state
        .locations
        .read()
        .await
        .iter()
        .find(|loc| loc.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Unable to find location '{id}'")))
}

#[derive(Serialize)]
struct RefreshResponse {
    count: usize,
}

/// Re-fetch the feed. A failed fetch leaves the previous cache in place, so
/// this always answers with the current cache size.
async fn refresh_locations(State(state): State<AppState>) -> Json<RefreshResponse> {
    let count = state.refresh_locations().await;
    Json(RefreshResponse { count })
}
