//! Book catalog: create, list, search, update and delete book records.

pub mod error;
pub mod mapper;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validator;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

use service::BookService;
use store::BookStore;

/// Books module wiring the catalog service into the module lifecycle
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            service: BookService::new(store),
        }
    }

    /// Schema for [`store::SqliteBookStore`]. The unique index on `book_id`
    /// is what makes concurrent duplicate inserts fail.
    pub fn schema() -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                    book_id             TEXT    NOT NULL CHECK (book_id <> ''),
                    title               TEXT    NOT NULL CHECK (title <> ''),
                    author              TEXT    NOT NULL CHECK (author <> ''),
                    genre               TEXT,
                    availability_status TEXT    NOT NULL DEFAULT 'AVAILABLE'
                );
                CREATE UNIQUE INDEX books_book_id_unique ON books (book_id);
                "#,
        }]
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        Self::schema()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the given record store
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn book_list_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                }
            }
        }
    })
}

fn book_id_parameter() -> serde_json::Value {
    json!({
        "name": "bookId",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn query_parameter(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "schema": { "type": "string" }
    })
}

fn book_input_body() -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookInput" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let statuses: Vec<&str> = models::AvailabilityStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect();

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "View all books",
                    "tags": ["Books"],
                    "responses": {
                        "200": book_list_response("Every book in the catalog"),
                        "503": error_response("Record store unavailable")
                    }
                },
                "post": {
                    "summary": "Add a new book",
                    "description": "Responds 201 Created with the stored book.",
                    "tags": ["Books"],
                    "requestBody": book_input_body(),
                    "responses": {
                        "201": book_response("Book created"),
                        "400": error_response("Malformed request body"),
                        "409": error_response("A book with this bookId already exists"),
                        "422": error_response("Missing required field or unknown status")
                    }
                }
            },
            "/search": {
                "get": {
                    "summary": "Search books by bookId or title",
                    "description": concat!(
                        "bookId is an exact match and takes priority. ",
                        "title is a case-insensitive substring match. ",
                        "An empty parameter still counts as supplied."
                    ),
                    "tags": ["Books"],
                    "parameters": [query_parameter("bookId"), query_parameter("title")],
                    "responses": {
                        "200": book_list_response("Matching books"),
                        "400": error_response("Neither bookId nor title supplied"),
                        "404": error_response("No matching book")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/{bookId}": {
                "patch": {
                    "summary": "Update book details",
                    "description": concat!(
                        "Applies a non-blank title or author and any supplied ",
                        "availabilityStatus. bookId and genre are not changed."
                    ),
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "requestBody": book_input_body(),
                    "responses": {
                        "200": book_response("Updated book"),
                        "404": error_response("Book not found"),
                        "422": error_response("Unknown availability status")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "description": "Responds 200 with a JSON confirmation message.",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Book deleted",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "message": { "type": "string" } }
                                    }
                                }
                            }
                        },
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "bookId": {
                            "type": "string",
                            "description": "Caller-assigned unique identifier"
                        },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": ["string", "null"] },
                        "availabilityStatus": { "type": "string", "enum": statuses }
                    },
                    "required": ["bookId", "title", "author", "availabilityStatus"]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "bookId": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "availabilityStatus": {
                            "type": "string",
                            "description": "Case-insensitive; defaults to AVAILABLE on creation",
                            "enum": statuses
                        }
                    }
                }
            }
        }
    })
}
