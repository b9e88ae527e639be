use kernel::model::book::event::CreateBook;
use serde::{Deserialize, Serialize};

/// One parsed spreadsheet row, as previewed to the librarian and sent back
/// verbatim on commit.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportCandidate {
    pub title: String,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
}

impl From<CreateBook> for ImportCandidate {
    fn from(event: CreateBook) -> Self {
        ImportCandidate {
            title: event.title,
            authors: event.authors,
            publisher: event.publisher,
            isbn: event.isbn,
            year: event.year,
            category: event.category,
        }
    }
}

impl From<ImportCandidate> for CreateBook {
    fn from(candidate: ImportCandidate) -> Self {
        CreateBook {
            title: candidate.title,
            authors: candidate.authors,
            publisher: candidate.publisher,
            isbn: candidate.isbn,
            location: None,
            year: candidate.year,
            category: candidate.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportPreviewResponse {
    pub parsed: usize,
    pub candidates: Vec<ImportCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct ImportCommitRequest {
    pub candidates: Vec<ImportCandidate>,
}

#[derive(Debug, Serialize)]
pub struct ImportReportResponse {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub message: String,
}
