pub mod health;
pub mod pdf;
pub mod summaries;

pub use health::*;
pub use pdf::*;
pub use summaries::*;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::{cors_layer, logging_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// The full route table with middleware applied.
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config().max_upload_bytes() + MULTIPART_OVERHEAD_BYTES)
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .route("/pdf", get(list_pdfs_handler).post(create_pdf_handler))
        .route("/pdf/upload", post(upload_pdf_handler))
        .route("/pdf/:id", get(get_pdf_handler).delete(delete_pdf_handler))
        .route("/pdf/:id/summarize", post(summarize_pdf_handler))
        .route("/summaries", get(list_summaries_handler))
        .route(
            "/summaries/:id",
            get(get_summary_handler).delete(delete_summary_handler),
        )
        .fallback(not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(from_fn_with_state(state.clone(), logging_middleware))
                .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

pub async fn not_found_handler() -> AppError {
    AppError::not_found("Route")
}
