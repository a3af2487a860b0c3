pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::{CorsConfig, Settings},
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let cors = cors_layer(&settings.cors);
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/announcements", announcement_routes())

        // Add state to the router
        .with_state(app_state)

        // Middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::announcements::list).post(handlers::announcements::create),
        )
        .route(
            "/:id",
            get(handlers::announcements::get).patch(handlers::announcements::update_status),
        )
        .route(
            "/:id/comments",
            get(handlers::comments::list).post(handlers::comments::create),
        )
        // Reading reactions is open; writing them needs a user identifier
        .route(
            "/:id/reactions",
            get(handlers::reactions::list).merge(
                post(handlers::reactions::create)
                    .delete(handlers::reactions::delete)
                    .route_layer(axum::middleware::from_fn(middleware::user::require_user)),
            ),
        )
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::IF_NONE_MATCH,
            HeaderName::from_static(middleware::user::USER_ID_HEADER),
            HeaderName::from_static(handlers::reactions::IDEMPOTENCY_KEY_HEADER),
        ])
        .expose_headers([axum::http::header::ETAG])
}
