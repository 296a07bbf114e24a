use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, ReturnValue, TransactWriteItem};
use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::books::domain::Author;
use crate::books::domain::model::{BookEntity, sort_books};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, Page, PageRequest};
use crate::core::repository::Repository;
use crate::utils::ddb::{is_service_error, parse_date_attribute, parse_item, parse_list_attribute, parse_number_attribute, parse_string_attribute, string_date};

const SEQUENCE_NAME: &str = "books";

// DDBBookRepository stores books in a table keyed by isbn, so isbn uniqueness is enforced by
// conditional writes. Numeric ids come from an atomic counter in a separate sequence table.
#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    sequence_table_name: String,
}

impl DDBBookRepository {
    pub fn new(client: Client, table_name: &str, sequence_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            sequence_table_name: sequence_table_name.to_string(),
        }
    }

    async fn next_id(&self) -> LibraryResult<i64> {
        let out = self.client
            .update_item()
            .table_name(self.sequence_table_name.as_str())
            .key("name", AttributeValue::S(SEQUENCE_NAME.to_string()))
            .update_expression("ADD last_id :one")
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await?;
        match out.attributes() {
            Some(attrs) => Ok(parse_number_attribute("last_id", attrs)),
            None => Err(LibraryError::database("book sequence returned no value", None, false)),
        }
    }

    fn to_item(&self, entity: &BookEntity) -> LibraryResult<HashMap<String, AttributeValue>> {
        let val = serde_json::to_value(entity)?;
        Ok(parse_item(val)?)
    }

    async fn put_existing(&self, item: HashMap<String, AttributeValue>, isbn: &str) -> LibraryResult<()> {
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .condition_expression("attribute_exists(isbn)")
            .set_item(Some(item))
            .send()
            .await.map(|_| ()).map_err(|err| {
            if is_service_error(&err, |e| e.is_conditional_check_failed_exception()) {
                LibraryError::book_not_found(isbn)
            } else {
                LibraryError::from(err)
            }
        })
    }

    // moves a book to a new isbn: the old item must still exist and the new isbn must be free
    async fn move_to_isbn(&self, key: &str, item: HashMap<String, AttributeValue>, new_isbn: &str) -> LibraryResult<()> {
        let delete = Delete::builder()
            .table_name(self.table_name.as_str())
            .key("isbn", AttributeValue::S(key.to_string()))
            .condition_expression("attribute_exists(isbn)")
            .build();
        let put = Put::builder()
            .table_name(self.table_name.as_str())
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(isbn)")
            .build();
        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().delete(delete).build())
            .transact_items(TransactWriteItem::builder().put(put).build())
            .send()
            .await.map(|_| ()).map_err(|err| {
            let mut failed = (false, false);
            if let aws_sdk_dynamodb::error::SdkError::ServiceError(ctx) = &err {
                if let TransactWriteItemsError::TransactionCanceledException(e) = ctx.err() {
                    let reasons = e.cancellation_reasons().unwrap_or_default();
                    let conditional = |i: usize| reasons.get(i)
                        .and_then(|r| r.code())
                        .map(|code| code == "ConditionalCheckFailed")
                        .unwrap_or(false);
                    failed = (conditional(0), conditional(1));
                }
            }
            match failed {
                (true, _) => LibraryError::book_not_found(key),
                (_, true) => LibraryError::book_already_exists(new_isbn),
                _ => LibraryError::from(err),
            }
        })
    }

    async fn scan_all(&self) -> LibraryResult<Vec<BookEntity>> {
        let mut books = vec![];
        let mut exclusive_start_key = None;
        loop {
            let out = self.client
                .scan()
                .table_name(self.table_name.as_str())
                .consistent_read(true)
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await?;
            for item in out.items().unwrap_or_default() {
                books.push(map_to_book(item)?);
            }
            exclusive_start_key = out.last_evaluated_key().cloned();
            if exclusive_start_key.is_none() {
                break;
            }
        }
        Ok(books)
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let now = Utc::now().naive_utc();
        let mut book = entity.clone();
        book.id = self.next_id().await?;
        book.created_at = now;
        book.updated_at = now;
        let item = self.to_item(&book)?;
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .condition_expression("attribute_not_exists(isbn)")
            .set_item(Some(item))
            .send()
            .await.map_err(|err| {
            if is_service_error(&err, |e| e.is_conditional_check_failed_exception()) {
                LibraryError::book_already_exists(book.isbn.as_str())
            } else {
                LibraryError::from(err)
            }
        })?;
        debug!("created book {} with id {}", book.isbn, book.id);
        Ok(book)
    }

    async fn update(&self, key: &str, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let existing = self.get(key).await?;
        let book = BookEntity {
            id: existing.id,
            created_at: existing.created_at,
            updated_at: Utc::now().naive_utc(),
            ..entity.clone()
        };
        let item = self.to_item(&book)?;
        if book.isbn == key {
            self.put_existing(item, key).await?;
        } else {
            self.move_to_isbn(key, item, book.isbn.as_str()).await?;
        }
        Ok(book)
    }

    async fn get(&self, key: &str) -> LibraryResult<BookEntity> {
        let out = self.client
            .get_item()
            .table_name(self.table_name.as_str())
            .key("isbn", AttributeValue::S(key.to_string()))
            .consistent_read(true)
            .send()
            .await?;
        match out.item() {
            Some(item) => map_to_book(item),
            None => Err(LibraryError::book_not_found(key)),
        }
    }

    async fn delete(&self, key: &str) -> LibraryResult<usize> {
        self.client.delete_item()
            .table_name(self.table_name.as_str())
            .key("isbn", AttributeValue::S(key.to_string()))
            .condition_expression("attribute_exists(isbn)")
            .send()
            .await.map(|_| 1).map_err(|err| {
            if is_service_error(&err, |e| e.is_conditional_check_failed_exception()) {
                LibraryError::book_not_found(key)
            } else {
                LibraryError::from(err)
            }
        })
    }

    async fn find_all(&self, req: &PageRequest) -> LibraryResult<Page<BookEntity>> {
        page_scanned(self.scan_all().await?, req)
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn update_description(&self, isbn: &str, description: &str) -> LibraryResult<BookEntity> {
        let out = self.client
            .update_item()
            .table_name(self.table_name.as_str())
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .update_expression("SET description = :description, updated_at = :updated_at")
            .expression_attribute_values(":description", AttributeValue::S(description.to_string()))
            .expression_attribute_values(":updated_at", string_date(Utc::now().naive_utc()))
            .condition_expression("attribute_exists(isbn)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await.map_err(|err| {
            if is_service_error(&err, |e| e.is_conditional_check_failed_exception()) {
                LibraryError::book_not_found(isbn)
            } else {
                LibraryError::from(err)
            }
        })?;
        match out.attributes() {
            Some(attrs) => map_to_book(attrs),
            None => Err(LibraryError::book_not_found(isbn)),
        }
    }
}

fn required_string(name: &str, map: &HashMap<String, AttributeValue>) -> LibraryResult<String> {
    parse_string_attribute(name, map)
        .ok_or_else(|| LibraryError::serialization(format!("book item is missing {}", name).as_str()))
}

fn required_date(name: &str, map: &HashMap<String, AttributeValue>) -> LibraryResult<NaiveDateTime> {
    parse_date_attribute(name, map)
        .ok_or_else(|| LibraryError::serialization(format!("book item is missing {}", name).as_str()))
}

// scan order is arbitrary, so id order is the natural order that ties fall back to
fn page_scanned(mut books: Vec<BookEntity>, req: &PageRequest) -> LibraryResult<Page<BookEntity>> {
    books.sort_by_key(|b| b.id);
    sort_books(&mut books, req)?;
    Ok(Page::slice(req, books))
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> LibraryResult<BookEntity> {
    let authors: BTreeSet<Author> = parse_list_attribute("authors", map).into_iter().map(|m| {
        Author::new(
            parse_string_attribute("firstName", m).unwrap_or_default().as_str(),
            parse_string_attribute("lastName", m).unwrap_or_default().as_str())
    }).collect();
    Ok(BookEntity {
        id: parse_number_attribute("id", map),
        isbn: required_string("isbn", map)?,
        title: required_string("title", map)?,
        description: parse_string_attribute("description", map),
        authors,
        publisher: required_string("publisher", map)?,
        created_at: required_date("created_at", map)?,
        updated_at: required_date("updated_at", map)?,
    })
}
