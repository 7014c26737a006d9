//! API handlers for Booklib REST endpoints

pub mod books;
pub mod openapi;

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, uri::PathAndQuery, Uri},
    middleware,
    routing::get,
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, repository::BookRepository};

/// URL prefix the book routes are nested under
pub const API_PREFIX: &str = "/api/v1";

static BOOK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("book id pattern is valid"));

static BOOKS_TRAILING_SLASHES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}/books/+$", API_PREFIX)).expect("books path pattern is valid")
});

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<dyn BookRepository>,
}

impl AppState {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route(
            "/books",
            get(books::list_books).post(books::create_book),
        )
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state);

    let routes = Router::new()
        .route("/", get(welcome))
        .nest(API_PREFIX, api_v1)
        .merge(openapi::create_openapi_router());

    // Rewrites have to run before routing, so the routes sit behind a fallback
    Router::new()
        .fallback_service(routes)
        .layer(middleware::map_request(trim_books_trailing_slashes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// `/api/v1/books/`, `/api/v1/books//` and so on address the collection
async fn trim_books_trailing_slashes(mut req: Request) -> Request {
    if !BOOKS_TRAILING_SLASHES_RE.is_match(req.uri().path()) {
        return req;
    }

    let collection = format!("{}/books", API_PREFIX);
    let path_and_query = match req.uri().query() {
        Some(query) => format!("{}?{}", collection, query),
        None => collection,
    };

    let mut parts = req.uri().clone().into_parts();
    if let Ok(path_and_query) = PathAndQuery::try_from(path_and_query) {
        parts.path_and_query = Some(path_and_query);
        if let Ok(uri) = Uri::from_parts(parts) {
            *req.uri_mut() = uri;
        }
    }
    req
}

async fn welcome() -> &'static str {
    "Welcome to booklib API"
}

/// JSON request body.
///
/// Unlike `axum::Json` this does not look at `Content-Type`, reports an
/// empty body as `empty body` and any decode failure as a 400 carrying the
/// decoder's message.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::EmptyBody);
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

/// Book id taken from the `{id}` path segment.
///
/// Segments that are not all digits do not match the route at all; digits
/// that overflow an `i64` are a bad request.
#[derive(Debug, Clone, Copy)]
pub struct BookId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::UnmatchedRoute)?;

        if !BOOK_ID_RE.is_match(&raw) {
            return Err(AppError::UnmatchedRoute);
        }

        raw.parse::<i64>()
            .map(BookId)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}
