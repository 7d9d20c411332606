//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use auth::{
    AuthAppState, AuthConfig, CredentialDirectory, LocalSessionStore, auth_router, require_admin,
    require_session,
};
use auth::domain::repository::SessionRepository;
use axum::{
    Router, http,
    http::{Method, Uri, header},
    middleware,
};
use news::{
    ArticleSource, NewsApiClient, NewsAppState, NewsConfig, NewsFeed, PayoutRateStore,
    ResponseCache, news_router, payouts_router,
};
use platform::rate_limit::MinIntervalLimiter;
use platform::storage::LocalStore;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

use kernel::error::app_error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "newshub_api=info,news=info,auth=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Local store (sessions and payout rates)
    let store = Arc::new(match &config.local_store_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using file-backed local store");
            LocalStore::open(path)?
        }
        None => {
            tracing::info!("Using in-memory local store");
            LocalStore::in_memory()
        }
    });

    // News configuration
    let mut news_config = if cfg!(debug_assertions) {
        NewsConfig::development()
    } else {
        NewsConfig::default()
    };
    news_config.api_key = config.newsapi_key.clone();
    if let Some(base_url) = &config.newsapi_base_url {
        news_config.base_url = base_url.clone();
    }
    let news_config = Arc::new(news_config);

    // One limiter and one cache for the whole process
    let limiter = Arc::new(MinIntervalLimiter::new(&news_config.rate_limit()));
    let client = NewsApiClient::new(&news_config, limiter)?;
    let cache = Arc::new(ResponseCache::new(news_config.cache_ttl));
    let feed = Arc::new(NewsFeed::new(Arc::new(client), cache, &news_config));

    let news_state = NewsAppState::new(
        feed,
        news_config.clone(),
        PayoutRateStore::new(store.clone()),
    );

    // Auth configuration
    let auth_config = match config.session_secret {
        Some(secret) => AuthConfig {
            session_secret: secret,
            cookie_secure: !cfg!(debug_assertions),
            ..AuthConfig::default()
        },
        None => {
            tracing::warn!("SESSION_SECRET not set; sessions will not survive a restart");
            AuthConfig::development()
        }
    };
    let directory = CredentialDirectory::from_config(&auth_config)?;

    let auth_state = AuthAppState::new(
        Arc::new(LocalSessionStore::new(store.clone())),
        Arc::new(directory),
        Arc::new(auth_config),
    );

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = build_app(news_state, auth_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Route table: auth is open, pages need a session, payouts need an admin
fn build_app<S, R>(news_state: NewsAppState<S>, auth_state: AuthAppState<R>) -> Router
where
    S: ArticleSource + Send + Sync + 'static,
    R: SessionRepository + Send + Sync + 'static,
{
    let guard = auth_state.middleware_state();

    let pages = news_router(news_state.clone()).layer(middleware::from_fn_with_state(
        guard.clone(),
        require_session::<R>,
    ));
    let payouts = payouts_router(news_state)
        .layer(middleware::from_fn_with_state(guard, require_admin::<R>));

    Router::new()
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api", pages.merge(payouts))
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}
