use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    id::{BookId, LoanId},
    loan::LoanRecord,
};
use serde::{Deserialize, Serialize};

use super::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct LendBookRequest {
    #[garde(custom(not_blank))]
    pub borrower: String,
    #[garde(skip)]
    pub phone: Option<String>,
    /// Defaults to the current date when absent.
    #[garde(skip)]
    pub started_on: Option<NaiveDate>,
    #[garde(skip)]
    pub due_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LoanRecordResponse {
    pub id: LoanId,
    pub book_id: BookId,
    pub borrower: String,
    pub phone: Option<String>,
    pub started_on: NaiveDate,
    pub returned_on: NaiveDate,
}

impl From<LoanRecord> for LoanRecordResponse {
    fn from(record: LoanRecord) -> Self {
        LoanRecordResponse {
            id: record.id,
            book_id: record.book_id,
            borrower: record.borrower,
            phone: record.phone,
            started_on: record.started_on,
            returned_on: record.returned_on,
        }
    }
}
