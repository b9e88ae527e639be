use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{book::event::DeleteBook, id::BookId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::book::{BookListQuery, BookResponse, CreateBookRequest, UpdateBookRequest},
};

pub async fn show_book_list(
    _user: AuthorizedUser,
    Query(query): Query<BookListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookResponse>>> {
    registry
        .book_repository()
        .find_all(query.into())
        .await
        .map(|books| Json(books.into_iter().map(BookResponse::from).collect()))
}

pub async fn show_book(
    _user: AuthorizedUser,
    Path(book_id): Path<i64>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookResponse>> {
    registry
        .book_repository()
        .find_by_id(BookId::new(book_id))
        .await?
        .map(BookResponse::from)
        .map(Json)
        .ok_or_else(|| AppError::EntityNotFound(format!("book {book_id} not found")))
}

pub async fn register_book(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<StatusCode> {
    request.validate(&())?;
    registry
        .book_repository()
        .create(request.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn update_book(
    _user: AuthorizedUser,
    Path(book_id): Path<i64>,
    State(registry): State<AppRegistry>,
    Json(request): Json<UpdateBookRequest>,
) -> AppResult<StatusCode> {
    request.validate(&())?;
    registry
        .book_repository()
        .update(request.into_update(BookId::new(book_id)))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_book(
    _user: AuthorizedUser,
    Path(book_id): Path<i64>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .book_repository()
        .delete(DeleteBook {
            book_id: BookId::new(book_id),
        })
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
