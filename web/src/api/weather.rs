use crate::{error::Error, state::AppState};
use axum::{Json, Router, extract::State, routing::get};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(current_weather))
}

/// Pass-through of the configured weather endpoint. The map only shows the
/// result verbatim, so there is nothing to reshape here.
async fn current_weather(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, Error> {
    let Some(weather) = &state.config.weather else {
        return Err(Error::NotFound("Weather lookup is not configured".to_string()));
    };
    let report = state
        .http
        .get(&weather.url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(Error::WeatherUnavailable)?
        .json()
        .await
        .map_err(Error::WeatherUnavailable)?;
    Ok(Json(report))
}
