use crate::state::AppState;
use axum::{Router, routing::get};

mod category;
mod favorite;
mod location;
mod settings;
mod travellog;
mod weather;

#[cfg(test)]
mod tests;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .nest("/category", category::router())
        .nest("/location", location::router())
        .nest("/favorite", favorite::router())
        .nest("/travellog", travellog::router())
        .nest("/settings", settings::router())
        .nest("/weather", weather::router())
}

async fn root() -> &'static str {
    "tourmap API root here"
}
