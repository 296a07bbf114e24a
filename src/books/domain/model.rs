use std::cmp::Ordering;
use std::collections::BTreeSet;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::books::domain::Author;
use crate::core::library::{LibraryError, LibraryResult, PageRequest};

// BookEntity is the persisted form of a book. The id is assigned by the store on creation
// and the isbn is unique across all books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub description: Option<String>,
    pub authors: BTreeSet<Author>,
    pub publisher: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, authors: BTreeSet<Author>, publisher: &str) -> Self {
        Self {
            id: 0,
            isbn: isbn.to_string(),
            title: title.to_string(),
            description: None,
            authors,
            publisher: publisher.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

// BookSortField lists the attributes a book listing can be ordered by.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BookSortField {
    Id,
    Isbn,
    Title,
    Description,
    Publisher,
}

impl BookSortField {
    pub fn parse(name: &str) -> LibraryResult<BookSortField> {
        match name {
            "id" => Ok(BookSortField::Id),
            "isbn" => Ok(BookSortField::Isbn),
            "title" => Ok(BookSortField::Title),
            "description" => Ok(BookSortField::Description),
            "publisher" => Ok(BookSortField::Publisher),
            _ => Err(LibraryError::validation(
                format!("cannot sort books by unknown property: '{}'", name).as_str(), Some("sort".to_string()))),
        }
    }

    pub fn compare(&self, a: &BookEntity, b: &BookEntity) -> Ordering {
        match self {
            BookSortField::Id => a.id.cmp(&b.id),
            BookSortField::Isbn => a.isbn.cmp(&b.isbn),
            BookSortField::Title => a.title.cmp(&b.title),
            BookSortField::Description => a.description.cmp(&b.description),
            BookSortField::Publisher => a.publisher.cmp(&b.publisher),
        }
    }
}

// Sorts books by the single key of the page request. The sort is stable so equal keys
// keep the order the store returned them in.
pub fn sort_books(books: &mut [BookEntity], req: &PageRequest) -> LibraryResult<()> {
    let field = BookSortField::parse(req.sort.as_str())?;
    books.sort_by(|a, b| req.direction.apply(field.compare(a, b)));
    Ok(())
}
