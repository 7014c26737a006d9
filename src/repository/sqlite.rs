//! SQLite implementation of the book repository

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    ConnectOptions,
};

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::models::Book;

const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_name TEXT,
        author TEXT,
        price REAL,
        publication_date TEXT
    )
"#;

/// Book repository backed by a single SQLite file
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (creating if needed) the database file at `path` and ensure the
    /// `books` table exists.
    pub async fn connect<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RepositoryError::Database(sqlx::Error::Io(e))
                })?;
            }
        }

        let connect_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(connect_opts)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, for tests
    pub async fn in_memory() -> RepositoryResult<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?
            .disable_statement_logging();

        // Every connection to `:memory:` is a fresh database, so pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> RepositoryResult<Self> {
        sqlx::query(CREATE_BOOKS_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Wait for in-flight queries and close every connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl BookRepository for SqliteRepository {
    async fn create(&self, book: Book) -> RepositoryResult<i64> {
        let result = sqlx::query(
            "INSERT INTO books (book_name, author, price, publication_date) VALUES (?, ?, ?, ?)",
        )
        .bind(&book.name)
        .bind(&book.author)
        .bind(book.price)
        .bind(&book.publication_date)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> RepositoryResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, book_name, author, price, publication_date FROM books WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, book_name, author, price, publication_date FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn update(&self, id: i64, book: Book) -> RepositoryResult<u64> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(RepositoryError::NotFound(id));
        }

        let result = sqlx::query(
            "UPDATE books SET book_name = ?, author = ?, price = ?, publication_date = ? WHERE id = ?",
        )
        .bind(&book.name)
        .bind(&book.author)
        .bind(book.price)
        .bind(&book.publication_date)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
