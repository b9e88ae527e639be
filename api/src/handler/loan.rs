use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    id::BookId,
    loan::event::{LendBook, ReturnBook},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::{loan::LendBookRequest, loan::LoanRecordResponse, none_if_blank},
};

pub async fn lend_book(
    _user: AuthorizedUser,
    Path(book_id): Path<i64>,
    State(registry): State<AppRegistry>,
    Json(request): Json<LendBookRequest>,
) -> AppResult<StatusCode> {
    request.validate(&())?;
    let event = LendBook {
        book_id: BookId::new(book_id),
        borrower: request.borrower.trim().to_string(),
        phone: none_if_blank(request.phone),
        started_on: request
            .started_on
            .unwrap_or_else(|| Utc::now().date_naive()),
        due_on: request.due_on,
    };
    registry
        .loan_repository()
        .lend(event)
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn return_book(
    _user: AuthorizedUser,
    Path(book_id): Path<i64>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let event = ReturnBook {
        book_id: BookId::new(book_id),
        returned_on: Utc::now().date_naive(),
    };
    registry
        .loan_repository()
        .return_book(event)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn book_loan_history(
    _user: AuthorizedUser,
    Path(book_id): Path<i64>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<LoanRecordResponse>>> {
    registry
        .loan_repository()
        .find_history_by_book_id(BookId::new(book_id))
        .await
        .map(|records| {
            Json(
                records
                    .into_iter()
                    .map(LoanRecordResponse::from)
                    .collect(),
            )
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kernel::repository::{
        auth::MockAuthRepository, book::MockBookRepository, health::MockHealthCheckRepository,
        loan::MockLoanRepository, user::MockUserRepository,
    };
    use shared::error::AppError;

    use super::*;
    use crate::extractor::AuthorizedUser;
    use kernel::model::{auth::AccessToken, id::UserId, user::User};

    fn authorized_user() -> AuthorizedUser {
        AuthorizedUser {
            access_token: AccessToken("token".into()),
            user: User {
                id: UserId::new(uuid::Uuid::nil()),
                name: "librarian".into(),
                email: "librarian@example.com".into(),
            },
        }
    }

    fn registry_with_loan(loan: MockLoanRepository) -> AppRegistry {
        AppRegistry::with_repositories(
            Arc::new(MockBookRepository::new()),
            Arc::new(loan),
            Arc::new(MockAuthRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockHealthCheckRepository::new()),
        )
    }

    #[tokio::test]
    async fn lend_with_blank_borrower_is_rejected_before_any_store_call() {
        let mut loan = MockLoanRepository::new();
        loan.expect_lend().times(0);
        let registry = registry_with_loan(loan);

        let request = LendBookRequest {
            borrower: "   ".into(),
            phone: None,
            started_on: None,
            due_on: None,
        };
        let result = lend_book(authorized_user(), Path(1), State(registry), Json(request)).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn lend_fills_in_todays_start_date() {
        let mut loan = MockLoanRepository::new();
        loan.expect_lend()
            .withf(|event| {
                event.borrower == "Maria Rossi"
                    && event.phone.is_none()
                    && event.due_on.is_none()
                    && event.started_on == Utc::now().date_naive()
            })
            .times(1)
            .returning(|_| Ok(()));
        let registry = registry_with_loan(loan);

        let request = LendBookRequest {
            borrower: " Maria Rossi ".into(),
            phone: Some("  ".into()),
            started_on: None,
            due_on: None,
        };
        let result = lend_book(authorized_user(), Path(1), State(registry), Json(request)).await;

        assert_eq!(result.unwrap(), StatusCode::CREATED);
    }
}
