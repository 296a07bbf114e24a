use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::books::domain::Author;
use crate::core::library::{LibraryError, LibraryResult};

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    // assigned by the store, ignored on input
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<Author>)]
    pub authors: BTreeSet<Author>,
    #[serde(default)]
    pub publisher: String,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str, publisher: &str) -> BookDto {
        BookDto {
            id: None,
            isbn: isbn.to_string(),
            title: title.to_string(),
            description: None,
            authors: BTreeSet::new(),
            publisher: publisher.to_string(),
        }
    }

    pub fn add_author(mut self, author: Author) -> Self {
        self.authors.insert(author);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    // isbn, title and publisher must not be blank and at least one author is required
    pub fn validate(&self) -> LibraryResult<()> {
        let mut invalid = vec![];
        if self.isbn.trim().is_empty() {
            invalid.push("isbn may not be blank");
        }
        if self.title.trim().is_empty() {
            invalid.push("title may not be blank");
        }
        if self.authors.is_empty() {
            invalid.push("authors may not be empty");
        }
        if self.publisher.trim().is_empty() {
            invalid.push("publisher may not be blank");
        }
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(LibraryError::validation(invalid.join(", ").as_str(), Some("book".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::Author;
    use crate::books::dto::BookDto;
    use crate::core::library::LibraryError;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("isbn", "title", "publisher")
            .add_author(Author::new("John", "Doe"))
            .add_author(Author::new("John", "Doe"));
        assert_eq!("isbn", book.isbn.as_str());
        assert_eq!("title", book.title.as_str());
        assert_eq!(1, book.authors.len());
        assert!(book.validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_books() {
        let book = BookDto::new(" ", "title", "publisher");
        match book.validate() {
            Err(LibraryError::Validation { message, .. }) => {
                assert_eq!("isbn may not be blank, authors may not be empty", message.as_str());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_decode_json_without_id() {
        let json = r#"{"isbn":"123-1234567890","title":"My new book","authors":[{"firstName":"John","lastName":"Doe"}],"publisher":"Publisher"}"#;
        let book: BookDto = serde_json::from_str(json).expect("should parse book");
        assert_eq!(None, book.id);
        assert_eq!(None, book.description);
        assert!(book.validate().is_ok());

        let book: BookDto = serde_json::from_str(r#"{"title":"My new book"}"#).expect("should parse book");
        assert!(book.validate().is_err());
    }
}
