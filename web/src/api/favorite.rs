use crate::{auth::SessionUser, error::Error, state::AppState};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use libtour::{favorite::Favorite, location::Location};
use serde::Serialize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_favorites))
        .route("/{pin_id}", axum::routing::post(add_favorite).delete(remove_favorite))
}

#[derive(Serialize)]
struct FavoritesResponse {
    pin_ids: Vec<String>,
    /// the favorited pins that exist in the current feed cache
    locations: Vec<Location>,
}

async fn list_favorites(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<FavoritesResponse>, Error> {
    let pin_ids = Favorite::pin_ids(user.user.id, &state.db).await?;
    let locations = state
        .locations
        .read()
        .await
        .iter()
        .filter(|loc| {
            loc.pin_id
                .as_ref()
                .is_some_and(|pin| pin_ids.contains(pin))
        })
        .cloned()
        .collect();
    Ok(Json(FavoritesResponse { pin_ids, locations }))
}

#[derive(Serialize)]
struct ModifyResponse {
    success: bool,
}

async fn add_favorite(
    user: SessionUser,
    Path(pin_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ModifyResponse>, Error> {
    Favorite::insert(user.user.id, &pin_id, &state.db).await?;
    Ok(Json(ModifyResponse { success: true }))
}

async fn remove_favorite(
    user: SessionUser,
    Path(pin_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ModifyResponse>, Error> {
    Favorite::delete(user.user.id, &pin_id, &state.db).await?;
    Ok(Json(ModifyResponse { success: true }))
}
