//! Repository layer for book persistence
//!
//! [`BookRepository`] is the contract between the HTTP layer and any
//! backend. [`sqlite::SqliteRepository`] is the embedded-SQL implementation
//! used by the server; [`memory::MemoryRepository`] keeps everything in
//! process.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Book;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

/// Errors surfaced by repository implementations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("book not found with id={0}")]
    NotFound(i64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Book persistence operations.
///
/// Implementations never validate field contents; callers do. The `id` of
/// any `Book` passed in is ignored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book and return the id assigned by the store
    async fn create(&self, book: Book) -> RepositoryResult<i64>;

    /// Fetch a single book, `NotFound` if no row has this id
    async fn get(&self, id: i64) -> RepositoryResult<Book>;

    /// All books, ordered by id
    async fn list(&self) -> RepositoryResult<Vec<Book>>;

    /// Replace the mutable fields of an existing book.
    ///
    /// Returns the number of rows updated (1), or `NotFound` when the id is
    /// absent.
    async fn update(&self, id: i64, book: Book) -> RepositoryResult<u64>;

    /// Remove a book, returning the number of rows deleted (0 when absent)
    async fn delete(&self, id: i64) -> RepositoryResult<u64>;
}
