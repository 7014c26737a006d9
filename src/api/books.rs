//! Book API endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::{AppState, BookId, JsonBody};
use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{Book, BookCreated, BookUpdated, BooksDeleted},
};

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = BookCreated),
        (status = 400, description = "Empty or malformed body, or storage failure", body = ErrorResponse),
        (status = 502, description = "Field validation failed", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(book): JsonBody<Book>,
) -> AppResult<(StatusCode, Json<BookCreated>)> {
    tracing::info!("creating a book");
    book.validate_new()?;

    let book_id = state.books.create(book).await.map_err(|e| {
        tracing::error!(error = %e, "failed to create book");
        AppError::CreateFailed
    })?;

    tracing::info!(id = book_id, "book created");
    Ok((StatusCode::CREATED, Json(BookCreated { book_id })))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    tracing::info!("fetching books");
    let books = state.books.list().await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 500, description = "Book not found or storage failure", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    tracing::info!(id, "fetching book");
    let book = state.books.get(id).await?;
    Ok(Json(book))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = Book,
    responses(
        (status = 200, description = "Book updated", body = BookUpdated),
        (status = 400, description = "Invalid ID or body", body = ErrorResponse),
        (status = 500, description = "Book not found or storage failure", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    JsonBody(book): JsonBody<Book>,
) -> AppResult<Json<BookUpdated>> {
    tracing::info!(id, "updating a book");
    let rows = state.books.update(id, book).await?;
    Ok(Json(BookUpdated::new(rows)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Number of books removed", body = BooksDeleted),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Json<BooksDeleted>> {
    tracing::info!(id, "deleting a book");
    let rows_deleted = state.books.delete(id).await?;
    Ok(Json(BooksDeleted { rows_deleted }))
}
