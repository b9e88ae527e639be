use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    book::{
        event::{CreateBook, DeleteBook, UpdateBook},
        Book, BookFilter,
    },
    id::BookId,
};

#[mockall::automock]
#[async_trait]
pub trait BookRepository: Send + Sync {
    // filtered catalog listing, ordered by id ascending
    async fn find_all(&self, filter: BookFilter) -> AppResult<Vec<Book>>;
    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>>;
    async fn create(&self, event: CreateBook) -> AppResult<()>;
    // bulk insert used by the spreadsheet import
    async fn create_many(&self, events: Vec<CreateBook>) -> AppResult<()>;
    async fn update(&self, event: UpdateBook) -> AppResult<()>;
    async fn delete(&self, event: DeleteBook) -> AppResult<()>;
    // every ISBN currently on record, for import deduplication
    async fn find_existing_isbns(&self) -> AppResult<Vec<String>>;
}
