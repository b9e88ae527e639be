use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::BookId,
    loan::{
        event::{LendBook, ReturnBook},
        LoanRecord,
    },
};

#[mockall::automock]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    // lend operation: Available -> OnLoan
    async fn lend(&self, event: LendBook) -> AppResult<()>;
    // return operation: OnLoan -> Available, archiving the loan first
    async fn return_book(&self, event: ReturnBook) -> AppResult<()>;
    // archived loans for one book, most recent start date first
    async fn find_history_by_book_id(&self, book_id: BookId) -> AppResult<Vec<LoanRecord>>;
}
