pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

// BookRepository stores books keyed by isbn, create and update enforce isbn uniqueness
// in a single write.
#[async_trait]
pub trait BookRepository: Repository<BookEntity> {
    // overwrites only the description of the book with given isbn
    async fn update_description(&self, isbn: &str, description: &str) -> LibraryResult<BookEntity>;
}
