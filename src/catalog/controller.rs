use axum::{
    body::HttpBody,
    BoxError,
    extract::{Path, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tracing::debug;
use utoipa::OpenApi;
use crate::books::domain::Author;
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse, ListingStatus};
use crate::catalog::command::patch_book_cmd::{PatchBookCommand, PatchBookCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::core::command::Command;
use crate::core::controller::{AppState, ErrorEntry, json_to_server_error, ServerError};

#[derive(OpenApi)]
#[openapi(
    paths(add_book, find_book_by_isbn, list_books, update_book, patch_book, remove_book),
    components(schemas(BookDto, Author, ErrorEntry)),
    tags((name = "books", description = "Operations to interact with books collection"))
)]
pub struct ApiDoc;

const OPENAPI_PATH: &str = "/api-docs/openapi.json";

// generic over the request body so the same routes serve both hyper and lambda_http requests
pub fn build_router<B>(state: AppState) -> Router<(), B>
    where
        B: HttpBody + Send + 'static,
        B::Data: Send,
        B::Error: Into<BoxError>,
{
    let router = Router::new()
        .route("/api/books", post(add_book).get(list_books))
        .route("/api/books/:isbn",
               get(find_book_by_isbn).put(update_book).patch(patch_book).delete(remove_book));
    with_api_docs(router).with_state(state)
}

#[cfg(not(feature = "swagger-ui"))]
fn with_api_docs<B>(router: Router<AppState, B>) -> Router<AppState, B>
    where
        B: HttpBody + Send + 'static,
{
    router.route(OPENAPI_PATH, get(openapi))
}

// the swagger ui serves the openapi document itself
#[cfg(feature = "swagger-ui")]
fn with_api_docs<B>(router: Router<AppState, B>) -> Router<AppState, B>
    where
        B: HttpBody + Send + 'static,
{
    router.merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

fn decode_book(body: Result<Json<Value>, JsonRejection>) -> Result<BookDto, ServerError> {
    let json = body.map_err(|err| ServerError::bad_request(err.body_text().as_str()))?;
    serde_json::from_value(json.0).map_err(json_to_server_error)
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookDto,
    responses(
        (status = 201, description = "Book successfully created",
            headers(("Location" = String, description = "The resulting URI of the book creation"))),
        (status = 400, description = "Book is invalid", body = [ErrorEntry]),
        (status = 409, description = "Book with same ISBN already exists", body = [ErrorEntry])
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>) -> Result<Response, ServerError> {
    let req = AddBookCommandRequest::new(decode_book(body)?);
    let res = AddBookCommand::new(state.catalog).execute(req).await?;
    let location = HeaderValue::from_str(res.location.as_str())
        .map_err(|err| ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string().as_str()))?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

#[utoipa::path(
    get,
    path = "/api/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Book successfully retrieved", body = BookDto),
        (status = 404, description = "Book does not exist", body = [ErrorEntry])
    )
)]
pub async fn find_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<BookDto>, ServerError> {
    let req = GetBookCommandRequest::new(isbn);
    let res = GetBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res.book))
}

#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    params(
        ("page" = Option<usize>, Query, description = "Zero-based page index, defaults to 0"),
        ("size" = Option<usize>, Query, description = "Page size, defaults to and capped at 50"),
        ("sort" = Option<String>, Query, description = "Property to sort by, defaults to id"),
        ("order" = Option<String>, Query, description = "asc for ascending, anything else for descending")
    ),
    responses(
        (status = 200, description = "All books are retrieved", body = [BookDto],
            headers(("X-Total-Count" = u64, description = "Total books number"))),
        (status = 204, description = "There is no book"),
        (status = 206, description = "Books are retrieved and there are others", body = [BookDto],
            headers(
                ("X-Total-Count" = u64, description = "Total books number"),
                ("first" = String, description = "First page URI"),
                ("last" = String, description = "Last page URI"),
                ("next" = String, description = "Next page URI"),
                ("prev" = String, description = "Previous page URI")
            )),
        (status = 400, description = "Paging parameters are invalid", body = [ErrorEntry])
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<ListBooksCommandRequest>, QueryRejection>) -> Result<Response, ServerError> {
    let Query(req) = query.map_err(|err| ServerError::bad_request(err.body_text().as_str()))?;
    let res = ListBooksCommand::new(state.catalog, state.config.max_page_size).execute(req).await?;
    debug!("listing {} of {} books as {:?}", res.books.len(), res.total, res.status);
    listing_response(res)
}

fn listing_response(res: ListBooksCommandResponse) -> Result<Response, ServerError> {
    let status = match res.status {
        ListingStatus::Empty => return Ok(StatusCode::NO_CONTENT.into_response()),
        ListingStatus::Full => StatusCode::OK,
        ListingStatus::Partial => StatusCode::PARTIAL_CONTENT,
    };
    let mut headers = HeaderMap::new();
    headers.insert("x-total-count", HeaderValue::from(res.total));
    let links = [
        ("first", res.links.first),
        ("last", res.links.last),
        ("next", res.links.next),
        ("prev", res.links.prev),
    ];
    for (name, link) in links {
        if let Some(uri) = link {
            let value = HeaderValue::from_str(uri.as_str())
                .map_err(|err| ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string().as_str()))?;
            headers.insert(name, value);
        }
    }
    Ok((status, headers, Json(res.books)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book to update")),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book successfully updated", body = BookDto),
        (status = 400, description = "Book is invalid", body = [ErrorEntry]),
        (status = 404, description = "Book does not exist", body = [ErrorEntry]),
        (status = 409, description = "Another book already has the new ISBN", body = [ErrorEntry])
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    body: Result<Json<Value>, JsonRejection>) -> Result<Json<BookDto>, ServerError> {
    let req = UpdateBookCommandRequest::new(isbn.as_str(), decode_book(body)?);
    let res = UpdateBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res.book))
}

#[utoipa::path(
    patch,
    path = "/api/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book to update")),
    request_body(content = String, description = "New description", content_type = "text/plain"),
    responses(
        (status = 200, description = "Book's description successfully updated", body = BookDto),
        (status = 404, description = "Book does not exist", body = [ErrorEntry])
    )
)]
pub async fn patch_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    description: String) -> Result<Json<BookDto>, ServerError> {
    let req = PatchBookCommandRequest::new(isbn.as_str(), description.as_str());
    let res = PatchBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res.book))
}

#[utoipa::path(
    delete,
    path = "/api/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book to delete")),
    responses(
        (status = 204, description = "Book successfully deleted"),
        (status = 404, description = "Book does not exist", body = [ErrorEntry])
    )
)]
pub async fn remove_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<StatusCode, ServerError> {
    let req = RemoveBookCommandRequest::new(isbn);
    let _ = RemoveBookCommand::new(state.catalog).execute(req).await?;
    Ok(StatusCode::NO_CONTENT)
}
