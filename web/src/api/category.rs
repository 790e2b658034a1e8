use crate::state::AppState;
use axum::{Json, Router, routing::get};
use libtour::category::{Category, CategoryInfo};
use strum::IntoEnumIterator;

pub fn router() -> Router<AppState> {
    Router::new().route("/list", get(list_categories))
}

/// The compiled-in registry; there is nothing to look up per request.
async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(Category::iter().map(|c| c.info()).collect())
}
