use chrono::NaiveDate;
use kernel::model::{
    id::{BookId, LoanId},
    loan::LoanRecord,
};

#[derive(Debug, sqlx::FromRow)]
pub struct LoanRecordRow {
    pub id: i64,
    pub book_id: i64,
    pub borrower: String,
    pub borrower_phone: Option<String>,
    pub started_on: NaiveDate,
    pub returned_on: NaiveDate,
}

impl From<LoanRecordRow> for LoanRecord {
    fn from(row: LoanRecordRow) -> Self {
        LoanRecord {
            id: LoanId::new(row.id),
            book_id: BookId::new(row.book_id),
            borrower: row.borrower,
            phone: row.borrower_phone,
            started_on: row.started_on,
            returned_on: row.returned_on,
        }
    }
}
