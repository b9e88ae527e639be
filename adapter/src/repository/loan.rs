use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        book::Book,
        id::BookId,
        loan::{
            event::{LendBook, ReturnBook},
            LoanRecord,
        },
    },
    repository::loan::LoanRepository,
};
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::{
    model::{book::BookRow, loan::LoanRecordRow},
    ConnectionPool,
};

#[derive(new)]
pub struct LoanRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl LoanRepository for LoanRepositoryImpl {
    async fn lend(&self, event: LendBook) -> AppResult<()> {
        let borrower = event.borrower.trim();
        if borrower.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "borrower name must not be empty".into(),
            ));
        }

        let mut tx = self.db.begin().await?;
        let book = fetch_book_for_update(&mut tx, event.book_id).await?;
        if book.loan.is_on_loan() {
            return Err(AppError::UnprocessableEntity(format!(
                "book {} is already on loan",
                event.book_id
            )));
        }

        sqlx::query(
            "UPDATE books SET is_on_loan = TRUE, borrower = $2, borrower_phone = $3, \
             loan_started_on = $4, loan_due_on = $5 WHERE id = $1",
        )
        .bind(event.book_id.into_inner())
        .bind(borrower)
        .bind(event.phone)
        .bind(event.started_on)
        .bind(event.due_on)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)
    }

    async fn return_book(&self, event: ReturnBook) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        let book = fetch_book_for_update(&mut tx, event.book_id).await?;
        let Some(loan) = book.loan.loan() else {
            return Err(AppError::UnprocessableEntity(format!(
                "book {} is not on loan",
                event.book_id
            )));
        };

        // archive first: if this write fails the whole transition aborts and
        // the loan record is not lost
        sqlx::query(
            "INSERT INTO loan_history (book_id, borrower, borrower_phone, started_on, returned_on) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.book_id.into_inner())
        .bind(&loan.borrower)
        .bind(&loan.phone)
        .bind(loan.started_on)
        .bind(event.returned_on)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        sqlx::query(
            "UPDATE books SET is_on_loan = FALSE, borrower = NULL, borrower_phone = NULL, \
             loan_started_on = NULL, loan_due_on = NULL WHERE id = $1",
        )
        .bind(event.book_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)
    }

    async fn find_history_by_book_id(&self, book_id: BookId) -> AppResult<Vec<LoanRecord>> {
        let rows: Vec<LoanRecordRow> = sqlx::query_as(
            "SELECT id, book_id, borrower, borrower_phone, started_on, returned_on \
             FROM loan_history WHERE book_id = $1 ORDER BY started_on DESC",
        )
        .bind(book_id.into_inner())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(LoanRecord::from).collect())
    }
}

async fn fetch_book_for_update(
    tx: &mut Transaction<'static, Postgres>,
    book_id: BookId,
) -> AppResult<Book> {
    let row: Option<BookRow> = sqlx::query_as(
        "SELECT id, title, authors, publisher, isbn, location, year, category, \
         is_on_loan, borrower, borrower_phone, loan_started_on, loan_due_on \
         FROM books WHERE id = $1 FOR UPDATE",
    )
    .bind(book_id.into_inner())
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?;
    row.map(Book::try_from)
        .transpose()?
        .ok_or_else(|| AppError::EntityNotFound(format!("book {book_id} not found")))
}
