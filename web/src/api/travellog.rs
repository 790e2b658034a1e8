use crate::{auth::SessionUser, error::Error, state::AppState, util::extract::Form};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use libtour::{empty_string_as_none, travellog::TravelLog};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_logs))
        .route("/new", post(add_log))
        .route("/{id}", delete(delete_log))
}

async fn list_logs(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TravelLog>>, Error> {
    Ok(Json(TravelLog::fetch_all_user(user.user.id, &state.db).await?))
}

#[derive(Debug, Deserialize)]
struct AddParams {
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    content: Option<String>,
    image_url: String,
}

#[derive(Serialize)]
struct AddResponse {
    success: bool,
    id: String,
}

async fn add_log(
    user: SessionUser,
    State(state): State<AppState>,
    Form(params): Form<AddParams>,
) -> Result<Json<AddResponse>, Error> {
    let log = TravelLog::new(user.user.id, params.title, params.content, params.image_url);
    log.insert(&state.db).await?;
    Ok(Json(AddResponse {
        success: true,
        id: log.id,
    }))
}

async fn delete_log(
    user: SessionUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, Error> {
    let log = TravelLog::fetch(&id, &state.db).await.map_err(|e| match e {
        libtour::Error::DatabaseRowNotFound(_) => {
            Error::NotFound(format!("Unable to find travel log '{id}'"))
        }
        _ => e.into(),
    })?;
    if log.userid != user.user.id {
        return Err(Error::Unauthorized(
            "No permission to delete this travel log".to_string(),
        ));
    }
    log.delete(&state.db).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
