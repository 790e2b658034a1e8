use anyhow::Result;
use axum::{
    Router,
    response::{IntoResponse, Redirect},
    routing::get,
};
use clap::Parser;
use state::SharedState;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

mod api;
mod auth;
mod config;
mod error;
mod state;
mod util;

const API_PREFIX: &str = "/api/v1";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(short, long, default_value = "tourmap.yaml")]
    pub config: PathBuf,
    #[arg(short, long, default_value = "dev")]
    pub env: String,
    #[arg(short, long, default_value = "web/static")]
    pub staticdir: PathBuf,
}

fn app_router(state: state::AppState, staticdir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/favicon.ico", get(favicon_redirect))
        .nest_service("/static", ServeDir::new(staticdir))
        .nest("/auth", auth::router())
        .nest(API_PREFIX, api::router())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("TOURWEB_LOG"))
        .init();
    let args = Cli::parse();

    let mut config = config::EnvConfig::load(&args.config, &args.env)?;
    config.init()?;
    info!("Starting up with environment '{}'", args.env);

    let shared_state = Arc::new(SharedState::new(config).await?);

    let session_store = SqliteStore::new(shared_state.db.pool().clone());
    session_store.migrate().await?;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    let app = app_router(shared_state.clone(), &args.staticdir)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!(
        "{}:{}",
        shared_state.config.listen.host, shared_state.config.listen.port
    )
    .parse()?;
    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> impl IntoResponse {
    Redirect::permanent("/static/index.html")
}

async fn favicon_redirect() -> impl IntoResponse {
    Redirect::permanent("/static/favicon.ico")
}

#[cfg(test)]
pub(crate) async fn test_app(
    pool: sqlx::Pool<sqlx::Sqlite>,
    locations: Vec<libtour::location::Location>,
) -> Result<(Router, state::AppState)> {
    // the token endpoint is unreachable; tests that exercise the OAuth flow
    // use test_app_with_token_url instead
    test_app_with_token_url(pool, locations, "http://127.0.0.1:1/oauth2/token".to_string()).await
}

#[cfg(test)]
pub(crate) async fn test_app_with_token_url(
    pool: sqlx::Pool<sqlx::Sqlite>,
    locations: Vec<libtour::location::Location>,
    token_url: String,
) -> Result<(Router, state::AppState)> {
    let state = Arc::new(SharedState::test_with_token_url(
        pool.clone(),
        locations,
        token_url,
    ));
    let session_store = SqliteStore::new(pool);
    session_store.migrate().await?;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));
    let app = app_router(state.clone(), std::path::Path::new("web/static")).layer(session_layer);
    Ok((app, state))
}
