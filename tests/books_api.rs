//! End-to-end tests of the books HTTP surface over in-memory SQLite.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shelf_db::Database;
use shelf_kernel::settings::{DatabaseSettings, Settings};
use tower::ServiceExt;

async fn app() -> Router {
    let settings = Settings {
        database: DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            ..DatabaseSettings::default()
        },
        ..Settings::default()
    };

    let database = Database::connect(&settings.database).await.unwrap();
    let registry = shelf_app::build_registry(&database);
    database
        .run_migrations(&registry.collect_migrations())
        .await
        .unwrap();

    shelf_http::build_router(&registry, &settings)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn hello() -> Value {
    json!({
        "bookId": "001",
        "title": "Hello",
        "author": "Rana Khunti",
        "genre": "Programming"
    })
}

#[tokio::test]
async fn create_defaults_status_and_search_finds_it() {
    let app = app().await;

    let (status, created) = send(&app, "POST", "/api/books", Some(hello())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({
            "bookId": "001",
            "title": "Hello",
            "author": "Rana Khunti",
            "genre": "Programming",
            "availabilityStatus": "AVAILABLE"
        })
    );

    let (status, found) = send(&app, "GET", "/api/books/search?bookId=001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([created]));
}

#[tokio::test]
async fn list_returns_all_books() {
    let app = app().await;

    let (status, books) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!([]));

    send(&app, "POST", "/api/books", Some(hello())).await;
    send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"bookId": "002", "title": "World", "author": "Someone"})),
    )
    .await;

    let (_, books) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(books.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_create_is_a_conflict() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, body) = send(&app, "POST", "/api/books", Some(hello())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "Book with ID 001 already exists");
}

#[tokio::test]
async fn missing_title_is_a_validation_error() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"bookId": "001", "author": "Rana Khunti"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "title");

    let (_, books) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/books")
        .header("content-type", "application/json")
        .body(Body::from("{\"bookId\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_errors() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, body) = send(&app, "GET", "/api/books/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "At least one parameter (bookId or title) must be provided"
    );

    let (status, _) = send(&app, "GET", "/api/books/search?bookId=999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/books/search?title=missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn title_search_is_case_insensitive() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;
    send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"bookId": "002", "title": "Say hello again", "author": "A"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"bookId": "003", "title": "Goodbye", "author": "B"})),
    )
    .await;

    let (status, books) = send(&app, "GET", "/api/books/search?title=HELLO", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["bookId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["001", "002"]);
}

#[tokio::test]
async fn title_search_folds_accented_letters() {
    let app = app().await;
    send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"bookId": "002", "title": "ÉCOLE DES FEMMES", "author": "Molière"})),
    )
    .await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, books) = send(&app, "GET", "/api/books/search?title=%C3%A9cole", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["title"], "ÉCOLE DES FEMMES");
}

#[tokio::test]
async fn empty_search_parameters_count_as_supplied() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, _) = send(&app, "GET", "/api/books/search?bookId=&title=Hello", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, books) = send(&app, "GET", "/api/books/search?title=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn patch_merges_supplied_fields() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, updated) = send(
        &app,
        "PATCH",
        "/api/books/001",
        Some(json!({"title": "Advanced Java"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Advanced Java");
    assert_eq!(updated["author"], "Rana Khunti");
    assert_eq!(updated["genre"], "Programming");
    assert_eq!(updated["availabilityStatus"], "AVAILABLE");

    let (status, updated) = send(
        &app,
        "PATCH",
        "/api/books/001",
        Some(json!({"availabilityStatus": "checked_out", "author": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["availabilityStatus"], "CHECKED_OUT");
    assert_eq!(updated["author"], "Rana Khunti");

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/books/999",
        Some(json!({"title": "Nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_with_unknown_status_is_rejected() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/books/001",
        Some(json!({"availabilityStatus": "shelved"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "availabilityStatus");
}

#[tokio::test]
async fn delete_removes_book() {
    let app = app().await;
    send(&app, "POST", "/api/books", Some(hello())).await;

    let (status, body) = send(&app, "DELETE", "/api/books/001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    let (status, _) = send(&app, "GET", "/api/books/search?bookId=001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/books/001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, spec) = send(&app, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/api/books"]["post"].is_object());
    assert!(spec["paths"]["/api/books/{bookId}"]["patch"].is_object());
}
