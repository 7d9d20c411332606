//! News Routers
//!
//! Two routers so the composition root can put different guards in front
//! of them: the pages every signed-in user sees, and the admin-only
//! payouts.

use crate::domain::source::ArticleSource;
use crate::presentation::handlers::{self, NewsAppState};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Dashboard, articles and analytics
pub fn news_router<S>(state: NewsAppState<S>) -> Router
where
    S: ArticleSource + Send + Sync + 'static,
{
    Router::new()
        .route("/dashboard", get(handlers::dashboard::<S>))
        .route("/articles", get(handlers::list_articles::<S>))
        .route("/articles/{id}", get(handlers::get_article::<S>))
        .route("/analytics", get(handlers::analytics::<S>))
        .with_state(state)
}

/// Payout management (admin only; the guard is applied by the caller)
pub fn payouts_router<S>(state: NewsAppState<S>) -> Router
where
    S: ArticleSource + Send + Sync + 'static,
{
    Router::new()
        .route("/payouts", get(handlers::list_payouts::<S>))
        .route("/payouts/rates", put(handlers::update_rates::<S>))
        .route("/payouts/status", post(handlers::update_status::<S>))
        .route("/payouts/export", get(handlers::export_payouts::<S>))
        .route("/payouts/report", get(handlers::payout_report::<S>))
        .route("/payouts/invoices", get(handlers::payout_invoices::<S>))
        .with_state(state)
}
