use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

/// Per-request id, visible to handlers and to the response logger.
#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Log 4xx/5xx responses together with the [`ErrorReport`] a handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let report = response.extensions_mut().remove::<ErrorReport>();
    let source = report.as_ref().map_or("unknown", |report| report.source);
    let chain = report.map(|report| report.messages).unwrap_or_default();
    let detail = chain
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");
    let elapsed_ms = started.elapsed().as_millis();

    if status.is_server_error() {
        error!(
            target = "jotter::http::response",
            status = status.as_u16(),
            %method,
            path,
            elapsed_ms,
            source,
            detail,
            chain = ?chain,
            request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "jotter::http::response",
            status = status.as_u16(),
            %method,
            path,
            elapsed_ms,
            source,
            detail,
            request_id,
            "client request error",
        );
    }

    response
}
