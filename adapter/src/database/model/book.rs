use chrono::NaiveDate;
use kernel::model::{
    book::{Book, Loan, LoanState},
    id::BookId,
};
use shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub is_on_loan: bool,
    pub borrower: Option<String>,
    pub borrower_phone: Option<String>,
    pub loan_started_on: Option<NaiveDate>,
    pub loan_due_on: Option<NaiveDate>,
}

impl TryFrom<BookRow> for Book {
    type Error = AppError;

    // the loan columns must be all set or all null, in step with the flag;
    // anything else is a corrupt row and refuses to convert
    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let loan = match (
            row.is_on_loan,
            row.borrower,
            row.loan_started_on,
        ) {
            (true, Some(borrower), Some(started_on)) => LoanState::OnLoan(Loan {
                borrower,
                phone: row.borrower_phone,
                started_on,
                due_on: row.loan_due_on,
            }),
            (false, None, None)
                if row.borrower_phone.is_none() && row.loan_due_on.is_none() =>
            {
                LoanState::Available
            }
            _ => {
                return Err(AppError::ConversionEntityError(format!(
                    "book {} has inconsistent loan columns",
                    row.id
                )))
            }
        };
        Ok(Book {
            id: BookId::new(row.id),
            title: row.title,
            authors: row.authors,
            publisher: row.publisher,
            isbn: row.isbn,
            location: row.location,
            year: row.year,
            category: row.category,
            loan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available_row() -> BookRow {
        BookRow {
            id: 1,
            title: "Il nome della rosa".into(),
            authors: Some("Umberto Eco".into()),
            publisher: None,
            isbn: Some("9788845292866".into()),
            location: Some("A3".into()),
            year: Some(1980),
            category: Some("Romanzo".into()),
            is_on_loan: false,
            borrower: None,
            borrower_phone: None,
            loan_started_on: None,
            loan_due_on: None,
        }
    }

    #[test]
    fn available_row_converts() {
        let book = Book::try_from(available_row()).unwrap();
        assert_eq!(book.loan, LoanState::Available);
    }

    #[test]
    fn on_loan_row_converts() {
        let mut row = available_row();
        row.is_on_loan = true;
        row.borrower = Some("Maria Rossi".into());
        row.loan_started_on = NaiveDate::from_ymd_opt(2024, 1, 10);

        let book = Book::try_from(row).unwrap();
        let loan = book.loan.loan().unwrap();
        assert_eq!(loan.borrower, "Maria Rossi");
        assert_eq!(loan.phone, None);
        assert_eq!(loan.due_on, None);
    }

    #[test]
    fn mixed_loan_columns_are_rejected() {
        // flag set but fields missing
        let mut row = available_row();
        row.is_on_loan = true;
        assert!(Book::try_from(row).is_err());

        // stray borrower on an available book
        let mut row = available_row();
        row.borrower = Some("Maria Rossi".into());
        assert!(Book::try_from(row).is_err());

        // stray phone with everything else null
        let mut row = available_row();
        row.borrower_phone = Some("+39 333 1234567".into());
        assert!(Book::try_from(row).is_err());
    }
}
