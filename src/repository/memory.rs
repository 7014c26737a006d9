//! In-process book repository

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::models::Book;

#[derive(Debug, Default)]
struct Shelf {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

/// Book repository holding everything in memory.
///
/// Ids start at 1 and are never handed out twice, even after a delete.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    shelf: RwLock<Shelf>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for MemoryRepository {
    async fn create(&self, book: Book) -> RepositoryResult<i64> {
        let mut shelf = self.shelf.write().await;
        shelf.last_id += 1;
        let id = shelf.last_id;
        shelf.books.insert(id, Book { id, ..book });
        Ok(id)
    }

    async fn get(&self, id: i64) -> RepositoryResult<Book> {
        self.shelf
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        Ok(self.shelf.read().await.books.values().cloned().collect())
    }

    async fn update(&self, id: i64, book: Book) -> RepositoryResult<u64> {
        let mut shelf = self.shelf.write().await;
        let stored = shelf
            .books
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        *stored = Book { id, ..book };
        Ok(1)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<u64> {
        let removed = self.shelf.write().await.books.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let repo = MemoryRepository::new();
        let a = repo.create(Book::new("A", "a", "2000", 1.0)).await.unwrap();
        repo.delete(a).await.unwrap();
        let b = repo.create(Book::new("B", "b", "2001", 2.0)).await.unwrap();
        assert_eq!((a, b), (1, 2));
    }

    #[tokio::test]
    async fn test_create_ignores_input_id() {
        let repo = MemoryRepository::new();
        let mut book = Book::new("A", "a", "2000", 1.0);
        book.id = 40;
        let id = repo.create(book).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = MemoryRepository::new();
        let err = repo
            .update(3, Book::new("A", "a", "2000", 1.0))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "book not found with id=3");
        assert_eq!(repo.delete(3).await.unwrap(), 0);
    }
}
