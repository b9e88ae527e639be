use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    book::{delete_book, register_book, show_book, show_book_list, update_book},
    import::{commit_import, preview_import},
    loan::{book_loan_history, lend_book, return_book},
};

pub fn build_book_routers() -> Router<AppRegistry> {
    let books_routers = Router::new()
        .route("/", get(show_book_list).post(register_book))
        .route("/import", post(commit_import))
        .route("/import/preview", post(preview_import))
        .route(
            "/:book_id",
            get(show_book).put(update_book).delete(delete_book),
        )
        .route("/:book_id/loans", get(book_loan_history).post(lend_book))
        .route("/:book_id/loans/return", put(return_book));

    Router::new().nest("/books", books_routers)
}
