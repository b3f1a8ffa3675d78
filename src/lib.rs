pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod password;
pub mod routes;
pub mod state;
pub mod validation;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::UserStore;
use crate::state::{AppState, SharedState};

pub fn build_app(store: Arc<dyn UserStore>, config: Config) -> Router {
    let body_limit = DefaultBodyLimit::max(config.max_body_size);
    let state: SharedState = Arc::new(AppState { store, config });

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(body_limit),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
