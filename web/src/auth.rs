use crate::{error::Error, state::AppState, util::extract::Query};
use anyhow::anyhow;
use axum::{
    Router,
    extract::{FromRequestParts, State},
    http::request::Parts,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use libtour::{
    auth::{SessionTokens, parse_jwt},
    user::User,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::debug;

pub(crate) const SESSION_TOKENS_KEY: &str = "oauth.tokens";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", post(logout))
}

/// The logged-in caller: the stored user row plus the session's token
/// material. Extraction re-validates the tokens on every request, refreshing
/// them against the identity provider when they are close to expiry.
pub(crate) struct SessionUser {
    pub(crate) user: User,
    #[allow(dead_code)]
    pub(crate) tokens: SessionTokens,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|e| anyhow!(e.1))?;
        let mut tokens: SessionTokens = session
            .get(SESSION_TOKENS_KEY)
            .await?
            .ok_or_else(|| Error::Unauthorized("No logged in user".to_string()))?;
        if !state.auth.check_and_refresh(&mut tokens).await? {
            session.flush().await?;
            return Err(Error::Unauthorized("Your session has expired".to_string()));
        }
        // persist the (possibly refreshed) tokens back into the session
        session.insert(SESSION_TOKENS_KEY, &tokens).await?;
        let user = User::load_by_sub(&tokens.sub, &state.db)
            .await?
            .ok_or_else(|| Error::Unauthorized("Unknown user".to_string()))?;
        Ok(SessionUser { user, tokens })
    }
}

/// Send the visitor to the provider's hosted login page.
async fn login(State(state): State<AppState>) -> impl IntoResponse {
    Redirect::to(&state.config.oauth.login_url)
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// The provider redirects back here with `?code=` after a successful login.
async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    if let Some(error) = params.error {
        return Err(Error::Unauthorized(format!("Login was refused: {error}")));
    }
    let code = params
        .code
        .ok_or_else(|| Error::Unauthorized("No authorization code provided".to_string()))?;

    let tokens = state.auth.exchange_code(&code).await?;
    let claims = parse_jwt(&tokens.id_token)?;
    let session_tokens = SessionTokens::from_token_set(tokens)?;

    let user = User::upsert(&claims.sub, claims.email.as_deref(), &state.db).await?;
    debug!("Logged in user {} ({})", user.id, user.sub);
    session.insert(SESSION_TOKENS_KEY, &session_tokens).await?;
    Ok(Redirect::to("/"))
}

async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}
