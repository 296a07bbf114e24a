use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

// PatchBookCommand replaces the description of a book and leaves every other field as is.
pub struct PatchBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl PatchBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PatchBookCommandRequest {
    pub isbn: String,
    pub description: String,
}

impl PatchBookCommandRequest {
    pub fn new(isbn: &str, description: &str) -> Self {
        Self {
            isbn: isbn.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatchBookCommandResponse {
    pub book: BookDto,
}

impl PatchBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<PatchBookCommandRequest, PatchBookCommandResponse> for PatchBookCommand {
    async fn execute(&self, req: PatchBookCommandRequest) -> Result<PatchBookCommandResponse, CommandError> {
        self.catalog_service.update_description(req.isbn.as_str(), req.description.as_str()).await
            .map_err(CommandError::from).map(PatchBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::Author;
    use crate::books::dto::BookDto;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::patch_book_cmd::{PatchBookCommand, PatchBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_run_patch_book() {
        let svc = factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await;
        let add_cmd = AddBookCommand::new(svc.clone());
        let patch_cmd = PatchBookCommand::new(svc);

        let book = BookDto::new("isbn", "test book", "Publisher").add_author(Author::new("John", "Doe"));
        let added = add_cmd.execute(AddBookCommandRequest::new(book)).await.expect("should add book");

        let res = patch_cmd.execute(PatchBookCommandRequest::new("isbn", "new description"))
            .await.expect("should patch book");
        assert_eq!(Some("new description".to_string()), res.book.description);
        assert_eq!(added.book.title, res.book.title);
        assert_eq!(added.book.publisher, res.book.publisher);
        assert_eq!(added.book.authors, res.book.authors);
        assert_eq!(added.book.isbn, res.book.isbn);
    }

    #[tokio::test]
    async fn test_should_not_patch_missing_book() {
        let svc = factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await;
        let patch_cmd = PatchBookCommand::new(svc);
        let res = patch_cmd.execute(PatchBookCommandRequest::new("000-1234567890", "new description")).await;
        assert!(matches!(res, Err(CommandError::NotFound { .. })));
    }
}
