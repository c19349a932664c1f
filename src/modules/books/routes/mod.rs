//! HTTP handlers for the books module, mounted under `/api/books`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use shelf_http::error::AppError;

use super::models::{BookDto, BookPayload, SearchParams};
use super::service::BookService;
use crate::utils;

pub fn router(service: BookService) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::debug!(target: "project.routes", %prefix, "registering books routes");

    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/search", get(search_books))
        .route("/health", get(health_check))
        .route("/{book_id}", patch(update_book).delete(delete_book))
        .with_state(service)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(service): State<BookService>) -> Result<Json<Vec<BookDto>>, AppError> {
    Ok(Json(service.list_books().await?))
}

async fn add_book(
    State(service): State<BookService>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<BookDto>), AppError> {
    let Json(payload) = payload?;
    let created = service.add_book(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn search_books(
    State(service): State<BookService>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BookDto>>, AppError> {
    let books = service
        .search_books(params.book_id.as_deref(), params.title.as_deref())
        .await?;
    Ok(Json(books))
}

async fn update_book(
    State(service): State<BookService>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<BookDto>, AppError> {
    let Json(changes) = payload?;
    Ok(Json(service.update_book(&book_id, changes).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    service.delete_book(&book_id).await?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
