use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blob_client::BlobClient;
use civic_common::Config;
use civic_queue::AnalysisQueue;
use civic_store::{ActionLedger, ComplaintStore, VoteLedger};

mod rest;

pub struct AppState {
    pub complaints: ComplaintStore,
    pub votes: VoteLedger,
    pub actions: ActionLedger,
    pub analysis: AnalysisQueue,
    pub blob: BlobClient,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("civic_api=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let complaints = ComplaintStore::new(pool.clone());
    complaints.migrate().await?;

    let state = Arc::new(AppState {
        votes: VoteLedger::new(pool.clone()),
        actions: ActionLedger::new(pool.clone(), complaints.clone()),
        analysis: AnalysisQueue::new(pool),
        blob: BlobClient::new(&config.blob_endpoint, &config.blob_bucket),
        complaints,
    });

    let app = Router::new()
        // Health check
        .route("/health", get(rest::health))
        // Complaints CRUD
        .route(
            "/complaints",
            get(rest::list_complaints).post(rest::create_complaint),
        )
        .route(
            "/complaints/{id}",
            get(rest::get_complaint).put(rest::update_complaint),
        )
        // Voting
        .route("/complaints/{id}/upvote", post(rest::upvote))
        .route("/complaints/{id}/downvote", post(rest::downvote))
        // Comments
        .route("/complaints/{id}/comments", get(rest::list_comments))
        .route("/complaints/comments", post(rest::add_comment))
        // Actions taken
        .route(
            "/complaints/{id}/actions",
            get(rest::list_actions).post(rest::add_action),
        )
        // Nearby search
        .route("/complaints/nearby", get(rest::nearby_complaints))
        // Image upload
        .route("/complaints/upload", post(rest::upload::upload_complaint_image))
        .route(
            "/complaints/upload/action",
            post(rest::upload::upload_action_image),
        )
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Complaint payloads are user data; keep intermediaries from caching them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("Complaint service starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
