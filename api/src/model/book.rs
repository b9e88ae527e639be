use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    book::{
        event::{CreateBook, UpdateBook},
        Book, BookFilter, LoanState, StatusFilter,
    },
    id::BookId,
};
use serde::{Deserialize, Serialize};

use super::{none_if_blank, not_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[garde(custom(not_blank))]
    pub title: String,
    #[garde(skip)]
    pub authors: Option<String>,
    #[garde(skip)]
    pub publisher: Option<String>,
    #[garde(skip)]
    pub isbn: Option<String>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(inner(range(min = 1000, max = 2100)))]
    pub year: Option<i32>,
    #[garde(skip)]
    pub category: Option<String>,
}

impl From<CreateBookRequest> for CreateBook {
    fn from(request: CreateBookRequest) -> Self {
        CreateBook {
            title: request.title.trim().to_string(),
            authors: none_if_blank(request.authors),
            publisher: none_if_blank(request.publisher),
            isbn: none_if_blank(request.isbn),
            location: none_if_blank(request.location),
            year: request.year,
            category: none_if_blank(request.category),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookRequest {
    #[garde(custom(not_blank))]
    pub title: String,
    #[garde(skip)]
    pub authors: Option<String>,
    #[garde(skip)]
    pub publisher: Option<String>,
    #[garde(skip)]
    pub isbn: Option<String>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(inner(range(min = 1000, max = 2100)))]
    pub year: Option<i32>,
    #[garde(skip)]
    pub category: Option<String>,
}

impl UpdateBookRequest {
    pub fn into_update(self, book_id: BookId) -> UpdateBook {
        UpdateBook {
            book_id,
            title: self.title.trim().to_string(),
            authors: none_if_blank(self.authors),
            publisher: none_if_blank(self.publisher),
            isbn: none_if_blank(self.isbn),
            location: none_if_blank(self.location),
            year: self.year,
            category: none_if_blank(self.category),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub year: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

impl From<BookListQuery> for BookFilter {
    fn from(query: BookListQuery) -> Self {
        BookFilter {
            search: none_if_blank(query.search),
            status: match query.status.as_deref() {
                Some("available") => StatusFilter::Available,
                Some("on-loan") => StatusFilter::OnLoan,
                _ => StatusFilter::Any,
            },
            // the year box is free-form; anything non-numeric means "no filter"
            year: query.year.and_then(|year| year.trim().parse().ok()),
            location: none_if_blank(query.location),
            category: none_if_blank(query.category),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub is_on_loan: bool,
    pub loan: Option<BookLoanResponse>,
}

#[derive(Debug, Serialize)]
pub struct BookLoanResponse {
    pub borrower: String,
    pub phone: Option<String>,
    pub started_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let (is_on_loan, loan) = match book.loan {
            LoanState::Available => (false, None),
            LoanState::OnLoan(loan) => (
                true,
                Some(BookLoanResponse {
                    borrower: loan.borrower,
                    phone: loan.phone,
                    started_on: loan.started_on,
                    due_on: loan.due_on,
                }),
            ),
        };
        BookResponse {
            id: book.id,
            title: book.title,
            authors: book.authors,
            publisher: book.publisher,
            isbn: book.isbn,
            location: book.location,
            year: book.year,
            category: book.category,
            is_on_loan,
            loan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_absent_query_fields_impose_no_predicate() {
        let filter: BookFilter = BookListQuery::default().into();
        assert_eq!(filter, BookFilter::default());

        let filter: BookFilter = BookListQuery {
            search: Some("   ".into()),
            status: Some("whatever".into()),
            year: Some("".into()),
            location: Some(" ".into()),
            category: None,
        }
        .into();
        assert_eq!(filter, BookFilter::default());
    }

    #[test]
    fn non_numeric_year_is_ignored_not_an_error() {
        let filter: BookFilter = BookListQuery {
            year: Some("duemila".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(filter.year, None);

        let filter: BookFilter = BookListQuery {
            year: Some(" 2020 ".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(filter.year, Some(2020));
    }

    #[test]
    fn status_strings_map_to_loan_predicates() {
        let available: BookFilter = BookListQuery {
            status: Some("available".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(available.status, StatusFilter::Available);

        let on_loan: BookFilter = BookListQuery {
            status: Some("on-loan".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(on_loan.status, StatusFilter::OnLoan);
    }

    #[test]
    fn blank_title_fails_validation() {
        let request = CreateBookRequest {
            title: "   ".into(),
            authors: None,
            publisher: None,
            isbn: None,
            location: None,
            year: None,
            category: None,
        };
        assert!(request.validate(&()).is_err());
    }

    #[test]
    fn implausible_year_fails_validation() {
        let request = CreateBookRequest {
            title: "Il nome della rosa".into(),
            authors: None,
            publisher: None,
            isbn: None,
            location: None,
            year: Some(99),
            category: None,
        };
        assert!(request.validate(&()).is_err());
    }
}
