use crate::{auth::SessionUser, error::Error, state::AppState, util::extract::Form};
use anyhow::anyhow;
use axum::{Json, Router, extract::State, routing::get};
use libtour::{category, category::Category, empty_string_as_none};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show_settings).put(update_settings))
}

#[derive(Serialize)]
struct SettingsResponse {
    selected_categories: Vec<Category>,
    show_marker_titles: bool,
}

async fn show_settings(user: SessionUser) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        selected_categories: user.user.selected(),
        show_marker_titles: user.user.show_marker_titles,
    })
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    /// comma-joined category ids
    #[serde(default, deserialize_with = "empty_string_as_none")]
    selected_categories: Option<String>,
    show_marker_titles: Option<bool>,
}

async fn update_settings(
    user: SessionUser,
    State(state): State<AppState>,
    Form(params): Form<UpdateParams>,
) -> Result<Json<SettingsResponse>, Error> {
    if params.selected_categories.is_none() && params.show_marker_titles.is_none() {
        return Err(anyhow!("No parameters given").into());
    }
    let mut user = user.user;
    if let Some(list) = params.selected_categories {
        user.set_selected(&category::parse_id_list(&list));
    }
    if let Some(show) = params.show_marker_titles {
        user.show_marker_titles = show;
    }
    user.update_settings(&state.db).await?;
    Ok(Json(SettingsResponse {
        selected_categories: user.selected(),
        show_marker_titles: user.show_marker_titles,
    }))
}
