use super::super::id::BookId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBook {
    pub title: String,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: String,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteBook {
    pub book_id: BookId,
}
