use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, Multipart, Path, RawQuery, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::Fingerprint;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::state::AppState;

/// Name of the form field carrying the paste.
const TEXT_FIELD: &str = "text";

/// `POST /`: store the submitted text and redirect to it.
///
/// `text` is read from a urlencoded or multipart body, falling back to the
/// query string. A missing field is stored as an empty paste. The bytes are
/// stored exactly as decoded, without any UTF-8 repair.
#[instrument(skip_all, fields(fingerprint))]
pub async fn create_paste(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    request: Request,
) -> Result<Response, AppError> {
    let content = match body_text(request).await? {
        Some(text) => text,
        None => query
            .as_deref()
            .and_then(|q| form_value(q.as_bytes(), TEXT_FIELD))
            .unwrap_or_default(),
    };
    let fingerprint = Fingerprint::derive(&content);
    tracing::Span::current().record("fingerprint", tracing::field::display(&fingerprint));

    state.store.put(&fingerprint, &content).await?;
    info!(bytes = content.len(), "Stored paste");

    let location = format!("/{fingerprint}");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// `GET /{key}`: return a stored paste as plain text.
#[instrument(skip_all)]
pub async fn get_paste(
    State(state): State<AppState>,
    key: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(key) = key.map_err(|_| AppError::BadRequest)?;
    let fingerprint = Fingerprint::parse(&key).map_err(|_| AppError::BadRequest)?;

    let content = state.store.get(&fingerprint).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=UTF-8")],
        content,
    )
        .into_response())
}

/// Extract the `text` field from the request body, if the body is a form.
///
/// Bodies of any other content type are ignored.
async fn body_text(request: Request) -> Result<Option<Vec<u8>>, AppError> {
    let mime = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "application/x-www-form-urlencoded" => {
            let body = Bytes::from_request(request, &())
                .await
                .map_err(|e| body_error(e.status()))?;
            Ok(form_value(&body, TEXT_FIELD))
        }
        "multipart/form-data" => {
            let mut multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| body_error(e.status()))?;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| body_error(e.status()))?
            {
                if field.name() == Some(TEXT_FIELD) {
                    let data = field.bytes().await.map_err(|e| body_error(e.status()))?;
                    return Ok(Some(data.to_vec()));
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

fn body_error(status: StatusCode) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest
    }
}

/// First value of `name` in an `application/x-www-form-urlencoded` string,
/// percent-decoded to raw bytes.
pub fn form_value(encoded: &[u8], name: &str) -> Option<Vec<u8>> {
    encoded.split(|b| *b == b'&').find_map(|pair| {
        let (key, value) = match pair.iter().position(|b| *b == b'=') {
            Some(i) => (&pair[..i], &pair[i + 1..]),
            None => (pair, &pair[..0]),
        };
        (form_decode(key) == name.as_bytes()).then(|| form_decode(value))
    })
}

fn form_decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}
