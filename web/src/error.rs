use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("You are not authorized to perform this action: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Libtour(#[from] libtour::Error),
    #[error("Resource Not Found: {0}")]
    NotFound(String),
    #[error("The provided query string was rejected: {0}")]
    UnprocessableEntityQueryRejection(#[source] QueryRejection),
    #[error("The provided form data was rejected: {0}")]
    UnprocessableEntityFormRejection(#[source] FormRejection),
    #[error("Session storage failed")]
    Session(#[from] tower_sessions::session::Error),
    #[error("The weather service is unavailable")]
    WeatherUnavailable(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn to_client_status(&self) -> (StatusCode, String) {
        match self {
            Error::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            Error::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown error".to_string(),
            ),
            Error::Libtour(e) => match e {
                libtour::Error::FeedRequest(_) | libtour::Error::FeedDecode(_) => (
                    StatusCode::BAD_GATEWAY,
                    "The location feed is unavailable".to_string(),
                ),
                libtour::Error::TokenRequest(_) => (
                    StatusCode::BAD_GATEWAY,
                    "The identity provider is unavailable".to_string(),
                ),
                libtour::Error::TokenRejected(_) | libtour::Error::TokenDecode(_) => (
                    StatusCode::UNAUTHORIZED,
                    "Login could not be completed".to_string(),
                ),
                libtour::Error::InvalidOperation(message) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "Library error".to_string()),
            },
            Error::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Error::UnprocessableEntityQueryRejection(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "The query string was not in the expected format. The request could not be processed.".to_string(),
            ),
            Error::UnprocessableEntityFormRejection(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "The form data was not in the expected format. The request could not be processed.".to_string(),
            ),
            Error::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session error".to_string(),
            ),
            Error::WeatherUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "The weather service is unavailable".to_string(),
            ),
        }
    }
}

// Tell axum how to convert our errors into a response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Got error for response: {self:?}");
        let (status, message) = self.to_client_status();
        (status, message).into_response()
    }
}
