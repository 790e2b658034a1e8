use crate::config::EnvConfig;
use anyhow::{Context, Result};
use libtour::{Database, auth::AuthClient, feed::FeedClient, location::Location};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

#[derive(Debug)]
pub struct SharedState {
    pub db: Database,
    pub http: reqwest::Client,
    pub auth: AuthClient,
    pub config: EnvConfig,
    /// the normalized feed, held for the lifetime of the process and
    /// replaced wholesale on refresh
    pub locations: RwLock<Vec<Location>>,
}

impl SharedState {
    pub async fn new(config: EnvConfig) -> Result<Self> {
        trace!("Creating shared app state");
        let db = Database::open(&config.database)
            .await
            .with_context(|| format!("Unable to open database {}", &config.database))?;
        let http = reqwest::Client::new();
        let auth = AuthClient::new(
            http.clone(),
            config.oauth.token_url.clone(),
            config.oauth.client_id.clone(),
            config.oauth.secret(),
            config.oauth.redirect_uri.clone(),
        );
        let state = Self {
            db,
            http,
            auth,
            config,
            locations: RwLock::new(Vec::new()),
        };
        state.refresh_locations().await;
        Ok(state)
    }

    /// Re-fetch the feed into the in-memory cache and return the number of
    /// cached records. A failed fetch keeps whatever the cache already holds
    /// and is reported as a log line plus an empty map, never a hard failure.
    pub async fn refresh_locations(&self) -> usize {
        let feed = FeedClient::new(self.http.clone());
        match feed.fetch(&self.config.feed.url).await {
            Ok(locations) => {
                let count = locations.len();
                *self.locations.write().await = locations;
                debug!("location cache now holds {count} records");
                count
            }
            Err(e) => {
                warn!("failed to load the location feed: {e}");
                self.locations.read().await.len()
            }
        }
    }

    #[cfg(test)]
    pub fn test_with_token_url(
        pool: sqlx::Pool<sqlx::Sqlite>,
        locations: Vec<Location>,
        token_url: String,
    ) -> Self {
        use crate::config::{FeedConfig, ListenConfig, OAuthConfig};
        debug!("Creating test shared app state");
        let http = reqwest::Client::new();
        let config = EnvConfig {
            listen: ListenConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: "test-tourmap.sqlite".to_string(),
            feed: FeedConfig {
                url: "http://127.0.0.1:1/locations.geojson".to_string(),
            },
            oauth: OAuthConfig {
                login_url: "http://127.0.0.1:1/login".to_string(),
                token_url,
                client_id: "test-client".to_string(),
                client_secret_file: String::new(),
                client_secret: Default::default(),
                redirect_uri: "http://127.0.0.1:8080".to_string(),
            },
            weather: None,
        };
        let auth = AuthClient::new(
            http.clone(),
            config.oauth.token_url.clone(),
            config.oauth.client_id.clone(),
            None,
            config.oauth.redirect_uri.clone(),
        );
        Self {
            db: Database::from(pool),
            http,
            auth,
            config,
            locations: RwLock::new(locations),
        }
    }
}

pub type AppState = Arc<SharedState>;
