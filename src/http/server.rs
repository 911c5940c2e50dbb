use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers;
use crate::document::convert::DocumentConverter;
use crate::quiz::requester::QuizService;

// Only the local frontend origin is allowed; methods and headers are open
// for it.
const ALLOWED_ORIGIN: &str = "http://localhost:3000";

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Process-wide state: the quiz service and the conversion port, built once
/// at startup and injected into handlers. Nothing here mutates per request.
pub struct AppState {
    pub quiz: QuizService,
    pub converter: Arc<dyn DocumentConverter>,
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(ALLOWED_ORIGIN.parse::<HeaderValue>().expect("valid origin"))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate-quiz", post(handlers::generate_quiz))
        .route(
            "/generate-quiz-from-youtube",
            post(handlers::generate_quiz_from_youtube),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("quizgen listening on {}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
