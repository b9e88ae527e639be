use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        book::{
            event::{CreateBook, DeleteBook, UpdateBook},
            Book, BookFilter, StatusFilter,
        },
        id::BookId,
    },
    repository::book::BookRepository,
};
use shared::error::{AppError, AppResult};
use sqlx::QueryBuilder;

use crate::database::{model::book::BookRow, ConnectionPool};

const BOOK_COLUMNS: &str = "id, title, authors, publisher, isbn, location, year, category, \
     is_on_loan, borrower, borrower_phone, loan_started_on, loan_due_on";

#[derive(new)]
pub struct BookRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn find_all(&self, filter: BookFilter) -> AppResult<Vec<Book>> {
        let mut query = QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM books WHERE TRUE"));

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query.push(" AND (title ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR authors ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR isbn ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR publisher ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }
        match filter.status {
            StatusFilter::Any => {}
            StatusFilter::Available => {
                query.push(" AND is_on_loan = FALSE");
            }
            StatusFilter::OnLoan => {
                query.push(" AND is_on_loan = TRUE");
            }
        }
        if let Some(year) = filter.year {
            query.push(" AND year = ");
            query.push_bind(year);
        }
        if let Some(location) = &filter.location {
            query.push(" AND location ILIKE ");
            query.push_bind(format!("%{}%", location.trim().to_uppercase()));
        }
        if let Some(category) = &filter.category {
            query.push(" AND category ILIKE ");
            query.push_bind(format!("%{}%", category.trim()));
        }
        query.push(" ORDER BY id ASC");

        let rows: Vec<BookRow> = query
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
                .bind(book_id.into_inner())
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        row.map(Book::try_from).transpose()
    }

    async fn create(&self, event: CreateBook) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO books (title, authors, publisher, isbn, location, year, category) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.title)
        .bind(event.authors)
        .bind(event.publisher)
        .bind(event.isbn)
        .bind(event.location)
        .bind(event.year)
        .bind(event.category)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn create_many(&self, events: Vec<CreateBook>) -> AppResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        let mut query = QueryBuilder::new(
            "INSERT INTO books (title, authors, publisher, isbn, location, year, category) ",
        );
        query.push_values(events, |mut row, event| {
            row.push_bind(event.title)
                .push_bind(event.authors)
                .push_bind(event.publisher)
                .push_bind(event.isbn)
                .push_bind(event.location)
                .push_bind(event.year)
                .push_bind(event.category);
        });
        query
            .build()
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn update(&self, event: UpdateBook) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE books SET title = $1, authors = $2, publisher = $3, isbn = $4, \
             location = $5, year = $6, category = $7 WHERE id = $8",
        )
        .bind(event.title)
        .bind(event.authors)
        .bind(event.publisher)
        .bind(event.isbn)
        .bind(event.location)
        .bind(event.year)
        .bind(event.category)
        .bind(event.book_id.into_inner())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if result.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "book {} not found",
                event.book_id
            )));
        }
        Ok(())
    }

    async fn delete(&self, event: DeleteBook) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(event.book_id.into_inner())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        // the store silently no-ops a delete blocked by its access policy,
        // so zero affected rows means "not authorized or not found"
        if result.rows_affected() < 1 {
            return Err(AppError::NoRowAffectedError(format!(
                "could not delete book {}: not authorized or not found",
                event.book_id
            )));
        }
        Ok(())
    }

    async fn find_existing_isbns(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT isbn FROM books WHERE isbn IS NOT NULL")
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }
}
