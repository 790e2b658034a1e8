//! Session management against the hosted OAuth identity provider.
//!
//! The provider performs all credential handling and token signing; this
//! module only runs the code/refresh grants against its token endpoint and
//! reads claims out of the id token payload. Signature verification is the
//! provider's concern, not ours.

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

/// Tokens are refreshed once they are within this margin of expiry.
pub const REFRESH_MARGIN: Duration = Duration::minutes(5);

/// The token endpoint's response to a successful grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub id_token: String,
    /// absent from refresh-grant responses; the caller keeps the old one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// lifetime of the access token, in seconds
    pub expires_in: i64,
}

/// Identity claims read from the id token payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: i64,
}

/// Decode the claims from a JWT without verifying its signature.
pub fn parse_jwt(token: &str) -> Result<Claims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::TokenDecode("token is not in header.payload.signature form".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error::TokenDecode(format!("payload is not valid base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::TokenDecode(format!("payload is not a claims object: {e}")))
}

/// The token material held for a logged-in session, with an absolute expiry
/// computed when the grant completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub sub: String,
}

impl SessionTokens {
    pub fn from_token_set(tokens: TokenSet) -> Result<Self> {
        let claims = parse_jwt(&tokens.id_token)?;
        Ok(Self {
            access_token: tokens.access_token,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_at: OffsetDateTime::now_utc() + Duration::seconds(tokens.expires_in),
            sub: claims.sub,
        })
    }

    pub fn needs_refresh(&self, margin: Duration) -> bool {
        self.expires_at - margin <= OffsetDateTime::now_utc()
    }
}

/// Client for the provider's `/oauth2/token` endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
}

impl AuthClient {
    pub fn new(
        http: reqwest::Client,
        token_url: String,
        client_id: String,
        client_secret: Option<String>,
        redirect_uri: String,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Exchange an authorization code for a fresh token set.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        debug!("exchanging authorization code for tokens");
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret));
        }
        self.post_token(&form).await
    }

    /// Run the refresh grant for an existing session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        debug!("refreshing session tokens");
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret));
        }
        self.post_token(&form).await
    }

    async fn post_token(&self, form: &[(&str, &str)]) -> Result<TokenSet> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(Error::TokenRequest)?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRejected(body));
        }
        response.json().await.map_err(Error::TokenRequest)
    }

    /// Ensure the session's tokens are usable, refreshing them when they are
    /// close to expiry. Returns whether the session is still valid; a
    /// rejected refresh grant means the user is logged out, not that the
    /// request failed.
    pub async fn check_and_refresh(&self, tokens: &mut SessionTokens) -> Result<bool> {
        if !tokens.needs_refresh(REFRESH_MARGIN) {
            return Ok(true);
        }
        let Some(refresh_token) = tokens.refresh_token.clone() else {
            return Ok(false);
        };
        match self.refresh(&refresh_token).await {
            Ok(set) => {
                let mut refreshed = SessionTokens::from_token_set(set)?;
                if refreshed.refresh_token.is_none() {
                    refreshed.refresh_token = Some(refresh_token);
                }
                *tokens = refreshed;
                Ok(true)
            }
            Err(Error::TokenRejected(msg)) => {
                warn!("refresh grant was rejected: {msg}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
