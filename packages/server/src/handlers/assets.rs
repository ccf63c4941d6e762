use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::assets::AssetProvider;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /`: the landing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    serve(&*state.assets, "index.html")
}

/// `GET /static/{*path}`
#[instrument(skip(state))]
pub async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(AppError::NotFound(format!("static/{path}")));
    }
    serve(&*state.assets, &format!("static/{path}"))
}

fn serve(assets: &dyn AssetProvider, path: &str) -> Result<Response, AppError> {
    let asset = assets
        .get(path)
        .ok_or_else(|| AppError::NotFound(path.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, asset.content_type)],
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        asset.data,
    )
        .into_response())
}
