use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

use super::rate_limit::client_key;
use crate::state::AppState;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// The id of the request currently running inside [`logging_middleware`], if any.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn logging_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_key(&request, state.config().trust_forwarded_for);
    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = &header_value {
        request.headers_mut().insert("x-request-id", value.clone());
    }

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        client = %client,
        "Request started"
    );

    // Error responses built further down pick the id up from here.
    let mut response = REQUEST_ID
        .scope(request_id.clone(), next.run(request))
        .await;

    let duration = start.elapsed();
    let status = response.status();

    if let Some(value) = header_value {
        response.headers_mut().insert("x-request-id", value);
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        client = %client,
        status = status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}
