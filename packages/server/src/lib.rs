pub mod assets;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

/// Largest request body accepted when submitting a paste.
pub const MAX_PASTE_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router.
///
/// A panicking handler is turned into a 500 for that request only; the
/// listener and other in-flight requests are unaffected.
pub fn build_router(state: AppState) -> axum::Router {
    routes::routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_PASTE_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "internal server error",
    )
        .into_response()
}
