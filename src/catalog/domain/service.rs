use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryResult, Page, PageRequest};

pub struct CatalogServiceImpl {
    book_repository: Arc<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub fn new(_config: &Configuration, book_repository: Arc<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    // the store rejects a taken isbn within the same write, there is no separate lookup
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let created = self.book_repository.create(&BookEntity::from(book)).await?;
        info!("added book {} with id {}", created.isbn, created.id);
        Ok(BookDto::from(&created))
    }

    async fn remove_book(&self, isbn: &str) -> LibraryResult<()> {
        let _ = self.book_repository.delete(isbn).await?;
        info!("removed book {}", isbn);
        Ok(())
    }

    async fn update_book(&self, isbn: &str, book: &BookDto) -> LibraryResult<BookDto> {
        let existing = self.book_repository.get(isbn).await?;
        let changed = BookEntity {
            isbn: book.isbn.to_string(),
            title: book.title.to_string(),
            description: book.description.clone(),
            authors: book.authors.clone(),
            publisher: book.publisher.to_string(),
            ..existing
        };
        let updated = self.book_repository.update(isbn, &changed).await?;
        info!("updated book {} (id {})", updated.isbn, updated.id);
        Ok(BookDto::from(&updated))
    }

    async fn update_description(&self, isbn: &str, description: &str) -> LibraryResult<BookDto> {
        let updated = self.book_repository.update_description(isbn, description).await?;
        info!("updated description of book {}", isbn);
        Ok(BookDto::from(&updated))
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(isbn).await.map(|b| BookDto::from(&b))
    }

    async fn find_books(&self, req: &PageRequest) -> LibraryResult<Page<BookDto>> {
        let page = self.book_repository.find_all(req).await?;
        debug!("found {} of {} books for {:?}", page.number_of_elements(), page.total_elements, req);
        Ok(page.map(|b| BookDto::from(&b)))
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: Some(other.id),
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            description: other.description.clone(),
            authors: other.authors.clone(),
            publisher: other.publisher.to_string(),
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        let entity = BookEntity::new(other.isbn.as_str(), other.title.as_str(),
                                     other.authors.clone(), other.publisher.as_str());
        match &other.description {
            Some(description) => entity.with_description(description),
            None => entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::books::domain::Author;
    use crate::books::dto::BookDto;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::{LibraryError, PageRequest, SortDirection};
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Arc<dyn CatalogService>> = AsyncOnce::new(async {
                factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await
            });
    }

    fn new_book(isbn: &str, title: &str) -> BookDto {
        BookDto::new(isbn, title, "Publisher").add_author(Author::new("John", "Doe"))
    }

    #[tokio::test]
    async fn test_should_add_book() {
        let catalog_svc = SUT_SVC.get().await.clone();

        let book = new_book("svc_isbn_1", "test book").with_description("about");
        let added = catalog_svc.add_book(&book).await.expect("should add book");
        assert!(added.id.is_some());

        let loaded = catalog_svc.find_book_by_isbn("svc_isbn_1").await.expect("should return book");
        assert_eq!(BookDto { id: None, ..loaded.clone() }, book);
        assert_eq!(added.id, loaded.id);
    }

    #[tokio::test]
    async fn test_should_not_add_duplicate_book() {
        let catalog_svc = SUT_SVC.get().await.clone();

        let _ = catalog_svc.add_book(&new_book("svc_isbn_2", "first")).await.expect("should add book");
        let res = catalog_svc.add_book(&new_book("svc_isbn_2", "second")).await;
        match res {
            Err(LibraryError::DuplicateKey { message }) => {
                assert_eq!("book already exists for ISBN: 'svc_isbn_2'", message.as_str());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_update_book() {
        let catalog_svc = SUT_SVC.get().await.clone();

        let added = catalog_svc.add_book(&new_book("svc_isbn_3", "test book")).await.expect("should add book");

        let book = BookDto::new("svc_isbn_3", "new title", "New Publisher")
            .add_author(Author::new("Jane", "Roe"))
            .with_description("new description");
        let updated = catalog_svc.update_book("svc_isbn_3", &book).await.expect("should update book");
        assert_eq!(added.id, updated.id);

        let loaded = catalog_svc.find_book_by_isbn("svc_isbn_3").await.expect("should return book");
        assert_eq!("new title", loaded.title.as_str());
        assert_eq!("New Publisher", loaded.publisher.as_str());
        assert_eq!(book.authors, loaded.authors);
    }

    #[tokio::test]
    async fn test_should_patch_only_description() {
        let catalog_svc = SUT_SVC.get().await.clone();

        let added = catalog_svc.add_book(&new_book("svc_isbn_4", "test book")).await.expect("should add book");
        let patched = catalog_svc.update_description("svc_isbn_4", "new description").await.expect("should patch book");
        assert_eq!(Some("new description".to_string()), patched.description);
        assert_eq!(BookDto { description: None, ..patched }, added);
    }

    #[tokio::test]
    async fn test_should_remove_book() {
        let catalog_svc = SUT_SVC.get().await.clone();

        let _ = catalog_svc.add_book(&new_book("svc_isbn_5", "test book")).await.expect("should add book");
        let _ = catalog_svc.remove_book("svc_isbn_5").await.expect("should remove book");

        let loaded = catalog_svc.find_book_by_isbn("svc_isbn_5").await;
        assert!(loaded.is_err());
    }

    #[tokio::test]
    async fn test_should_report_missing_books() {
        let catalog_svc = SUT_SVC.get().await.clone();
        let book = new_book("svc_missing", "test book");

        let results = vec![
            catalog_svc.find_book_by_isbn("svc_missing").await.map(|_| ()),
            catalog_svc.update_book("svc_missing", &book).await.map(|_| ()),
            catalog_svc.update_description("svc_missing", "x").await.map(|_| ()),
            catalog_svc.remove_book("svc_missing").await,
        ];
        for res in results {
            match res {
                Err(LibraryError::NotFound { message }) => assert!(message.contains("svc_missing")),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_should_find_books() {
        let catalog_svc = factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await;
        for i in 0..3 {
            let _ = catalog_svc.add_book(&new_book(format!("isbn_{}", i).as_str(), format!("title_{}", i).as_str()))
                .await.expect("should add book");
        }
        let page = catalog_svc.find_books(&PageRequest::new(0, 2, "title", SortDirection::Desc)).await.expect("should return page");
        assert_eq!(3, page.total_elements);
        assert_eq!(vec!["title_2", "title_1"], page.content.iter().map(|b| b.title.as_str()).collect::<Vec<&str>>());
    }
}
