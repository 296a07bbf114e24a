use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // This is a retry-able error, which indicates that the store is throttling or temporarily
    // unreachable. The caller can retry the request with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn book_not_found(isbn: &str) -> LibraryError {
        LibraryError::not_found(format!("could not find book with ISBN: '{}'", isbn).as_str())
    }

    pub fn book_already_exists(isbn: &str) -> LibraryError {
        LibraryError::duplicate_key(format!("book already exists for ISBN: '{}'", isbn).as_str())
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for repository and service calls.
pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    // only the literal "asc" sorts ascending, any other token is descending
    pub fn from_order(order: &str) -> Self {
        if order == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

// It defines one slice of a collection: zero-based page index, page size and single sort key
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: String,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: usize, size: usize, sort: &str, direction: SortDirection) -> Self {
        PageRequest {
            page,
            size,
            sort: sort.to_string(),
            direction,
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

// It defines abstraction for one page of sorted records along with the size of the whole collection
#[derive(Debug, Clone)]
pub struct Page<T> {
    // zero-based page index
    pub page: usize,
    // requested page size
    pub size: usize,
    // number of records across all pages
    pub total_elements: usize,
    // records of this page
    pub content: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(req: &PageRequest, total_elements: usize, content: Vec<T>) -> Self {
        Page {
            page: req.page,
            size: req.size,
            total_elements,
            content,
        }
    }

    // slices an already sorted collection
    pub fn slice(req: &PageRequest, sorted: Vec<T>) -> Self {
        let total_elements = sorted.len();
        let content = sorted.into_iter().skip(req.offset()).take(req.size).collect();
        Page::new(req, total_elements, content)
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            1
        } else {
            (self.total_elements + self.size - 1) / self.size
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            content: self.content.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use crate::core::library::{LibraryError, Page, PageRequest, SortDirection};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        assert!(matches!(LibraryError::duplicate_key("test"), LibraryError::DuplicateKey{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_book_errors() {
        let err = LibraryError::book_not_found("978-1");
        assert_eq!("could not find book with ISBN: '978-1'", err.to_string());
        let err = LibraryError::book_already_exists("978-1");
        assert_eq!("book already exists for ISBN: '978-1'", err.to_string());
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert!(!LibraryError::database("test", None, false).retryable());
        assert!(!LibraryError::duplicate_key("test").retryable());
        assert!(!LibraryError::not_found("test").retryable());
        assert!(!LibraryError::unavailable("test", None, false).retryable());
        assert!(LibraryError::unavailable("test", None, true).retryable());
        assert!(!LibraryError::validation("test", None).retryable());
        assert!(!LibraryError::serialization("test").retryable());
        assert!(!LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_parse_sort_direction() {
        assert_eq!(SortDirection::Asc, SortDirection::from_order("asc"));
        assert_eq!(SortDirection::Desc, SortDirection::from_order("desc"));
        assert_eq!(SortDirection::Desc, SortDirection::from_order("ASC"));
        assert_eq!(SortDirection::Desc, SortDirection::from_order(""));
        assert_eq!(Ordering::Greater, SortDirection::Desc.apply(Ordering::Less));
    }

    #[tokio::test]
    async fn test_should_slice_page() {
        let req = PageRequest::new(1, 2, "id", SortDirection::Asc);
        let page = Page::slice(&req, vec![1, 2, 3, 4, 5]);
        assert_eq!(vec![3, 4], page.content);
        assert_eq!(5, page.total_elements);
        assert_eq!(3, page.total_pages());
        assert!(page.has_next());
        assert!(page.has_previous());

        let req = PageRequest::new(2, 2, "id", SortDirection::Asc);
        let page = Page::slice(&req, vec![1, 2, 3, 4, 5]);
        assert_eq!(vec![5], page.content);
        assert!(!page.has_next());

        let req = PageRequest::new(7, 2, "id", SortDirection::Asc);
        let page = Page::slice(&req, vec![1, 2, 3]);
        assert!(page.content.is_empty());
        assert_eq!(3, page.total_elements);
    }
}
