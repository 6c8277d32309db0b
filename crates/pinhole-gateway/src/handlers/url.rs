use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, UrlResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinhole_core::ShortCode;
use tracing::info;

/// Validates that the URL has a valid format (has a scheme and host).
fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(AppError::InvalidUrl("URL cannot be empty".to_string()));
    }

    // It ends up in a Location header.
    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AppError::InvalidUrl(format!(
            "URL must not contain whitespace or control characters: {:?}",
            url
        )));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(AppError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {}",
            url
        )));
    };
    if scheme.is_empty() || rest.is_empty() || rest.starts_with('/') {
        return Err(AppError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {}",
            url
        )));
    }

    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(AppError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            scheme
        )));
    }

    Ok(())
}

/// `POST /x`: shortens the URL in the JSON body.
pub async fn create_url_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<UrlResponse>> {
    let request: CreateUrlRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_url(&request.url)?;

    let url = request.url;
    let record = state.with_store(move |store| store.store_url(&url)).await?;
    info!(code = %record.code, url = %record.url, "stored url");

    Ok(Json(UrlResponse::from_record(record, state.base_url())))
}

/// `GET /x/{code}`: redirects to the stored URL and counts the visit.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(code);
    let (record, location) = state
        .with_store(move |store| {
            let record = store.get_by_code(&code)?;
            // A url that can't go in a Location header is not redirected, so
            // the visit is not counted either.
            let Ok(location) = HeaderValue::from_str(&record.url) else {
                return Ok((record, None));
            };
            store.increment(&code)?;
            Ok((record, Some(location)))
        })
        .await?;

    let location = location.ok_or_else(|| AppError::UnusableRecord(record.code.to_string()))?;
    Ok((StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response())
}

/// `GET /info/{code}`: returns the record without counting a visit.
pub async fn info_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>> {
    let code = ShortCode::new(code);
    let record = state.with_store(move |store| store.get_by_code(&code)).await?;

    Ok(Json(UrlResponse::from_record(record, state.base_url())))
}
