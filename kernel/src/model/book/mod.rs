use chrono::NaiveDate;

use super::id::BookId;

pub mod event;

#[derive(Debug, Clone)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub loan: LoanState,
}

/// Loan status of a catalog entry. The borrower fields exist only while the
/// book is out, so a half-populated loan is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanState {
    Available,
    OnLoan(Loan),
}

impl LoanState {
    pub fn is_on_loan(&self) -> bool {
        matches!(self, LoanState::OnLoan(_))
    }

    pub fn loan(&self) -> Option<&Loan> {
        match self {
            LoanState::Available => None,
            LoanState::OnLoan(loan) => Some(loan),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub borrower: String,
    pub phone: Option<String>,
    pub started_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
}

/// Filter set for the catalog listing. Every field is optional; absent
/// fields contribute no predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Available,
    OnLoan,
}
