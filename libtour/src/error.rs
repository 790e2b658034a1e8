//! Objects related to reporting errors from this library

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // feed-related errors
    #[error("feed request failed")]
    FeedRequest(#[source] reqwest::Error),

    #[error("feed returned a malformed document")]
    FeedDecode(#[source] serde_json::Error),

    // identity-provider errors
    #[error("token endpoint request failed")]
    TokenRequest(#[source] reqwest::Error),

    #[error("token endpoint refused the grant: {}", .0)]
    TokenRejected(String),

    #[error("malformed identity token: {}", .0)]
    TokenDecode(String),

    #[error("invalid operation: {}", .0)]
    InvalidOperation(String),

    #[error("Database error: unspecified")]
    DatabaseUnspecified(#[source] sqlx::Error),

    #[error("Database error: row not found")]
    DatabaseRowNotFound(#[source] sqlx::Error),

    #[error("Database migration failed")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
}

impl std::convert::From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::DatabaseRowNotFound(value),
            _ => Self::DatabaseUnspecified(value),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
