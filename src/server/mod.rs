//! HTTP server: router assembly and process entry

use crate::api;
use crate::backend::Backends;
use crate::config::Config;
use crate::middleware::ObservabilityLayer;
use crate::openapi::ApiDoc;
use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

pub use crate::state::AppState;

/// Build state over HTTP backends, start the cascade workers and serve until Ctrl-C.
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let backends = Backends::from_config(&config)?;
    let http_addr = config.http_addr();
    let state = AppState::new(config, backends.clone(), prometheus_handle);

    let workers = state.cascade.spawn_workers(&backends);
    info!(
        workers = workers.len(),
        capacity = state.config.cascade.queue_capacity,
        "Cascade workers started"
    );

    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Pending cascade work lives only in this process.
    for worker in workers {
        worker.abort();
    }
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let timeout = state.config.request_timeout();

    Router::new()
        // System
        .route("/health", get(api::health::health))
        .route("/metrics", get(api::metrics::metrics_handler))
        // Categories
        .route(
            "/api/categories/",
            get(api::category::list).post(api::category::create),
        )
        .route(
            "/api/categories/{category_uid}",
            get(api::post::list_by_category).post(api::post::create),
        )
        .route("/api/categories/{category_uid}/info", get(api::category::get))
        .route(
            "/api/categories/{category_uid}/reports",
            get(api::category::list_reports),
        )
        .route(
            "/api/categories/{category_uid}/reports/{report_uid}",
            delete(api::category::delete_report),
        )
        .route(
            "/api/categories/{category_uid}/posts/{post_uid}",
            delete(api::post::delete),
        )
        .route(
            "/api/categories/{category_uid}/posts/{post_uid}/report",
            post(api::post::report),
        )
        .route(
            "/api/categories/{category_uid}/posts/{post_uid}/comments/{comment_uid}",
            delete(api::comment::delete),
        )
        .route(
            "/api/categories/{category_uid}/posts/{post_uid}/comments/{comment_uid}/report",
            post(api::comment::report),
        )
        // Posts
        .route("/api/posts/", get(api::post::list))
        .route(
            "/api/posts/{post_uid}",
            get(api::post::get).patch(api::post::update),
        )
        .route("/api/posts/{post_uid}/like", patch(api::post::like))
        .route("/api/posts/{post_uid}/dislike", patch(api::post::dislike))
        .route(
            "/api/posts/{post_uid}/comments/",
            get(api::comment::list).post(api::comment::create),
        )
        .route(
            "/api/posts/{post_uid}/comments/{comment_uid}",
            get(api::comment::get).patch(api::comment::update),
        )
        // Identity
        .route("/api/user", post(api::user::register))
        .route("/api/user/{uid}", get(api::user::get))
        .route("/api/auth/token", post(api::user::token))
        .route("/api/auth/refresh", post(api::user::refresh))
        // OAuth
        .route("/api/oauth/app", post(api::user::create_app))
        .route("/api/oauth/app/{app_uid}", get(api::user::app_info))
        .route("/api/oauth/authorize", post(api::user::authorize))
        .route("/api/oauth/token", get(api::user::oauth_token))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()))
        .layer(ObservabilityLayer)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
