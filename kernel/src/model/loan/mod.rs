use chrono::NaiveDate;

use super::id::{BookId, LoanId};

pub mod event;

/// Archival snapshot of one completed loan cycle. Written exactly once when
/// a book is returned and never mutated afterwards; it references the book
/// by plain identifier so it survives deletion of the book itself.
#[derive(Debug, Clone)]
pub struct LoanRecord {
    pub id: LoanId,
    pub book_id: BookId,
    pub borrower: String,
    pub phone: Option<String>,
    pub started_on: NaiveDate,
    pub returned_on: NaiveDate,
}
