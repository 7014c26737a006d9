//! Data models for Booklib

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookCreated, BookUpdated, BooksDeleted};
