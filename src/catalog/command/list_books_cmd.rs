use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{Page, PageRequest, SortDirection};

const BOOKS_PATH: &str = "/api/books";

// ListBooksCommand returns one sorted page of books together with the links needed to walk
// the rest of the collection.
pub struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
    max_page_size: usize,
}

impl ListBooksCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>, max_page_size: usize) -> Self {
        Self {
            catalog_service,
            max_page_size,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBooksCommandRequest {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListBooksCommandRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            sort: None,
            order: None,
        }
    }

    pub fn sorted(mut self, sort: &str, order: &str) -> Self {
        self.sort = Some(sort.to_string());
        self.order = Some(order.to_string());
        self
    }

    // page defaults to 0, size defaults to and is capped at max_page_size, sort defaults to id
    // ascending
    pub fn build_page_request(&self, max_page_size: usize) -> PageRequest {
        let size = match self.size {
            Some(size) if size > 0 => size.min(max_page_size),
            _ => max_page_size,
        };
        PageRequest::new(
            self.page.unwrap_or(0),
            size,
            self.sort.as_deref().unwrap_or("id"),
            SortDirection::from_order(self.order.as_deref().unwrap_or("asc")),
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum ListingStatus {
    // the page holds the whole collection
    Full,
    // more books exist beyond this page
    Partial,
    // nothing on this page
    Empty,
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct PageLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListBooksCommandResponse {
    pub status: ListingStatus,
    pub books: Vec<BookDto>,
    pub total: usize,
    pub links: PageLinks,
}

impl ListBooksCommandResponse {
    pub fn new(page: Page<BookDto>) -> Self {
        let total = page.total_elements;
        let page_items = page.number_of_elements();
        if page_items == 0 {
            return Self { status: ListingStatus::Empty, books: vec![], total, links: PageLinks::default() };
        }
        if page_items >= total {
            return Self { status: ListingStatus::Full, books: page.content, total, links: PageLinks::default() };
        }
        let links = PageLinks {
            first: Some(page_uri(0, page.size)),
            last: Some(page_uri(page.total_pages().saturating_sub(1), page.size)),
            next: if page.has_next() { Some(page_uri(page.page + 1, page.size)) } else { None },
            prev: if page.has_previous() { Some(page_uri(page.page - 1, page.size)) } else { None },
        };
        Self { status: ListingStatus::Partial, books: page.content, total, links }
    }
}

pub fn page_uri(page: usize, size: usize) -> String {
    format!("{}?page={}&size={}", BOOKS_PATH, page, size)
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let page_request = req.build_page_request(self.max_page_size);
        self.catalog_service.find_books(&page_request).await
            .map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::domain::Author;
    use crate::books::dto::BookDto;
    use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListingStatus, PageLinks};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::library::SortDirection;
    use crate::core::repository::RepositoryStore;

    async fn catalog_with_books() -> Arc<dyn CatalogService> {
        let svc = factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await;
        let books = [
            ("978-0321356680", "Effective Java"),
            ("978-0201485677", "Refactoring"),
            ("978-0596007126", "Head First Design Patterns"),
            ("978-0321349606", "Java Concurrency in Practice"),
        ];
        for (isbn, title) in books {
            let book = BookDto::new(isbn, title, "Publisher").add_author(Author::new("John", "Doe"));
            let _ = svc.add_book(&book).await.expect("should add book");
        }
        svc
    }

    fn ids(books: &[BookDto]) -> Vec<i64> {
        books.iter().filter_map(|b| b.id).collect()
    }

    #[tokio::test]
    async fn test_should_build_page_request() {
        let req = ListBooksCommandRequest::default().build_page_request(50);
        assert_eq!(0, req.page);
        assert_eq!(50, req.size);
        assert_eq!("id", req.sort.as_str());
        assert_eq!(SortDirection::Asc, req.direction);

        let req = ListBooksCommandRequest::new(3, 100).sorted("title", "DESC").build_page_request(50);
        assert_eq!(3, req.page);
        assert_eq!(50, req.size);
        assert_eq!(SortDirection::Desc, req.direction);

        let req = ListBooksCommandRequest::new(0, 0).build_page_request(50);
        assert_eq!(50, req.size);
    }

    #[tokio::test]
    async fn test_should_list_all_books() {
        let cmd = ListBooksCommand::new(catalog_with_books().await, 50);
        let res = cmd.execute(ListBooksCommandRequest::default()).await.expect("should list books");
        assert_eq!(ListingStatus::Full, res.status);
        assert_eq!(4, res.total);
        assert_eq!(vec![1, 2, 3, 4], ids(&res.books));
        assert_eq!(PageLinks::default(), res.links);
    }

    #[tokio::test]
    async fn test_should_list_first_page() {
        let cmd = ListBooksCommand::new(catalog_with_books().await, 50);
        let res = cmd.execute(ListBooksCommandRequest::new(0, 2)).await.expect("should list books");
        assert_eq!(ListingStatus::Partial, res.status);
        assert_eq!(4, res.total);
        assert_eq!(vec![1, 2], ids(&res.books));
        assert_eq!(Some("/api/books?page=0&size=2".to_string()), res.links.first);
        assert_eq!(Some("/api/books?page=1&size=2".to_string()), res.links.last);
        assert_eq!(Some("/api/books?page=1&size=2".to_string()), res.links.next);
        assert_eq!(None, res.links.prev);
    }

    #[tokio::test]
    async fn test_should_list_last_page() {
        let cmd = ListBooksCommand::new(catalog_with_books().await, 50);
        let res = cmd.execute(ListBooksCommandRequest::new(1, 2)).await.expect("should list books");
        assert_eq!(ListingStatus::Partial, res.status);
        assert_eq!(vec![3, 4], ids(&res.books));
        assert_eq!(Some("/api/books?page=0&size=2".to_string()), res.links.first);
        assert_eq!(Some("/api/books?page=1&size=2".to_string()), res.links.last);
        assert_eq!(None, res.links.next);
        assert_eq!(Some("/api/books?page=0&size=2".to_string()), res.links.prev);
    }

    #[tokio::test]
    async fn test_should_sort_books_by_title_desc() {
        let cmd = ListBooksCommand::new(catalog_with_books().await, 50);
        let res = cmd.execute(ListBooksCommandRequest::default().sorted("title", "desc"))
            .await.expect("should list books");
        assert_eq!(ListingStatus::Full, res.status);
        assert_eq!(vec![2, 4, 3, 1], ids(&res.books));
    }

    #[tokio::test]
    async fn test_should_list_nothing_beyond_last_page() {
        let cmd = ListBooksCommand::new(catalog_with_books().await, 50);
        let res = cmd.execute(ListBooksCommandRequest::new(5, 2)).await.expect("should list books");
        assert_eq!(ListingStatus::Empty, res.status);
        assert!(res.books.is_empty());
        assert_eq!(PageLinks::default(), res.links);

        let svc = factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await;
        let res = ListBooksCommand::new(svc, 50).execute(ListBooksCommandRequest::default()).await.expect("should list books");
        assert_eq!(ListingStatus::Empty, res.status);
    }

    #[tokio::test]
    async fn test_should_reject_unknown_sort() {
        let cmd = ListBooksCommand::new(catalog_with_books().await, 50);
        let res = cmd.execute(ListBooksCommandRequest::default().sorted("authors", "asc")).await;
        assert!(matches!(res, Err(CommandError::Validation { .. })));
    }
}
