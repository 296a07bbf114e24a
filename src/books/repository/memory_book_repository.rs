use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::books::domain::model::{BookEntity, sort_books};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, Page, PageRequest};
use crate::core::repository::Repository;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    // books by id so that iteration yields the natural store order
    books: BTreeMap<i64, BookEntity>,
    ids_by_isbn: HashMap<String, i64>,
}

impl MemoryState {
    fn id_of(&self, isbn: &str) -> LibraryResult<i64> {
        self.ids_by_isbn.get(isbn).copied().ok_or_else(|| LibraryError::book_not_found(isbn))
    }
}

// MemoryBookRepository keeps books in process memory. Every write runs under one write
// lock so the isbn check and the insert cannot interleave with another request.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    state: RwLock<MemoryState>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut state = self.state.write().await;
        if state.ids_by_isbn.contains_key(&entity.isbn) {
            return Err(LibraryError::book_already_exists(entity.isbn.as_str()));
        }
        state.last_id += 1;
        let now = Utc::now().naive_utc();
        let mut book = entity.clone();
        book.id = state.last_id;
        book.created_at = now;
        book.updated_at = now;
        state.ids_by_isbn.insert(book.isbn.clone(), book.id);
        state.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, key: &str, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut state = self.state.write().await;
        let id = state.id_of(key)?;
        if entity.isbn != key && state.ids_by_isbn.contains_key(&entity.isbn) {
            return Err(LibraryError::book_already_exists(entity.isbn.as_str()));
        }
        let existing = state.books.get(&id).cloned().ok_or_else(|| LibraryError::book_not_found(key))?;
        let book = BookEntity {
            id,
            created_at: existing.created_at,
            updated_at: Utc::now().naive_utc(),
            ..entity.clone()
        };
        state.ids_by_isbn.remove(key);
        state.ids_by_isbn.insert(book.isbn.clone(), id);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn get(&self, key: &str) -> LibraryResult<BookEntity> {
        let state = self.state.read().await;
        let id = state.id_of(key)?;
        state.books.get(&id).cloned().ok_or_else(|| LibraryError::book_not_found(key))
    }

    async fn delete(&self, key: &str) -> LibraryResult<usize> {
        let mut state = self.state.write().await;
        let id = state.id_of(key)?;
        state.ids_by_isbn.remove(key);
        Ok(state.books.remove(&id).map(|_| 1).unwrap_or(0))
    }

    async fn find_all(&self, req: &PageRequest) -> LibraryResult<Page<BookEntity>> {
        let mut books: Vec<BookEntity> = self.state.read().await.books.values().cloned().collect();
        sort_books(&mut books, req)?;
        Ok(Page::slice(req, books))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn update_description(&self, isbn: &str, description: &str) -> LibraryResult<BookEntity> {
        let mut state = self.state.write().await;
        let id = state.id_of(isbn)?;
        let book = state.books.get_mut(&id).ok_or_else(|| LibraryError::book_not_found(isbn))?;
        book.description = Some(description.to_string());
        book.updated_at = Utc::now().naive_utc();
        Ok(book.clone())
    }
}
