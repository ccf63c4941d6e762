use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::assets::index).post(handlers::paste::create_paste),
        )
        .route("/static/{*path}", get(handlers::assets::static_asset))
        .route("/{key}", get(handlers::paste::get_paste))
}
