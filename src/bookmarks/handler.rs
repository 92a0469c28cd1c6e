//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::pipeline::{CompositeProcessor, DeleteProcessor, Processor, ProcessorData};
use super::validate;
use crate::error::ProcessorError;
use crate::handler::AppState;
use crate::model::BookmarkInput;

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn unprocessable(msg: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn bad_gateway(msg: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    Json(payload): Json<BookmarkInput>,
) -> Response {
    if let Err(e) = validate::validate_url(payload.url.as_deref(), &state.allowed_domains) {
        tracing::info!("rejected bookmark input: {}", e);
        return unprocessable(&e.to_string());
    }

    let processor = CompositeProcessor::new(state.db.clone(), state.embed.clone());

    match processor.process(ProcessorData::Input(payload)).await {
        Ok(bookmark) => created(bookmark),
        Err(ProcessorError::Validation(msg)) => {
            tracing::info!("rejected bookmark input: {}", msg);
            unprocessable(&msg)
        }
        Err(e @ ProcessorError::Embed(_)) => {
            tracing::error!("embed lookup failed: {}", e);
            bad_gateway("Embed lookup failed")
        }
        Err(e) => {
            tracing::error!("Failed to create bookmark: {}", e);
            internal_error("Failed to create bookmark")
        }
    }
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Response {
    let limit = params.limit.unwrap_or(50).min(100);
    let offset = params.offset.unwrap_or(0);

    match state.db.list_bookmarks(limit, offset).await {
        Ok(bookmarks) => success(bookmarks),
        Err(e) => {
            tracing::error!("Failed to list bookmarks: {}", e);
            internal_error("Failed to list bookmarks")
        }
    }
}

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.db.get_bookmark(id).await {
        Ok(Some(bookmark)) => success(bookmark),
        Ok(None) => not_found("Bookmark not found"),
        Err(e) => {
            tracing::error!("Failed to get bookmark: {}", e);
            internal_error("Failed to get bookmark")
        }
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let bookmark = match state.db.get_bookmark(id).await {
        Ok(Some(bookmark)) => bookmark,
        Ok(None) => return not_found("Bookmark not found"),
        Err(e) => {
            tracing::error!("Failed to get bookmark: {}", e);
            return internal_error("Failed to delete bookmark");
        }
    };

    let processor = DeleteProcessor::new(state.db.clone());

    match processor.process(ProcessorData::Bookmark(bookmark)).await {
        Ok(_) => (StatusCode::NO_CONTENT, ()).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete bookmark: {}", e);
            internal_error("Failed to delete bookmark")
        }
    }
}
