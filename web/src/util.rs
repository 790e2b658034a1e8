use crate::error::Error;
use serde::de::DeserializeOwned;

/// Extractors that map rejections onto [crate::error::Error] so that
/// malformed query strings and form bodies produce our own error responses.
pub(crate) mod extract {
    use super::*;
    use axum::extract::{FromRequest, FromRequestParts, Request};
    use axum::http::request::Parts;

    pub(crate) struct Query<T>(pub T);

    impl<S, T> FromRequestParts<S> for Query<T>
    where
        S: Send + Sync,
        T: DeserializeOwned,
    {
        type Rejection = Error;

        async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
            axum_extra::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map(|q| Query(q.0))
                .map_err(Error::UnprocessableEntityQueryRejection)
        }
    }

    pub(crate) struct Form<T>(pub T);

    impl<S, T> FromRequest<S> for Form<T>
    where
        S: Send + Sync,
        T: DeserializeOwned,
    {
        type Rejection = Error;

        async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
            axum::Form::<T>::from_request(req, state)
                .await
                .map(|f| Form(f.0))
                .map_err(Error::UnprocessableEntityFormRejection)
        }
    }
}
