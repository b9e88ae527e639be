use chrono::NaiveDate;

use super::super::id::BookId;

#[derive(Debug, Clone)]
pub struct LendBook {
    pub book_id: BookId,
    pub borrower: String,
    pub phone: Option<String>,
    pub started_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnBook {
    pub book_id: BookId,
    pub returned_on: NaiveDate,
}
