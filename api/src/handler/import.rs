use axum::{
    extract::{Multipart, State},
    Json,
};
use kernel::{
    import::{existing_isbn_set, reconcile, spreadsheet},
    model::book::event::CreateBook,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::import::{
        ImportCandidate, ImportCommitRequest, ImportPreviewResponse, ImportReportResponse,
    },
};

/// Parses the uploaded workbook and returns the candidate rows without
/// touching the catalog, so the librarian can check them first.
pub async fn preview_import(
    _user: AuthorizedUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportPreviewResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("broken multipart upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::UnprocessableEntity(format!("could not read upload: {e}")))?;
        let candidates = spreadsheet::parse_catalog_sheet(&bytes)?;
        return Ok(Json(ImportPreviewResponse {
            parsed: candidates.len(),
            candidates: candidates.into_iter().map(ImportCandidate::from).collect(),
        }));
    }
    Err(AppError::UnprocessableEntity(
        "upload is missing a \"file\" field".into(),
    ))
}

pub async fn commit_import(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(request): Json<ImportCommitRequest>,
) -> AppResult<Json<ImportReportResponse>> {
    // drop title-less rows here too; a hand-edited commit body gets the same
    // treatment as a parsed sheet
    let candidates: Vec<CreateBook> = request
        .candidates
        .into_iter()
        .map(CreateBook::from)
        .filter(|candidate| !candidate.title.trim().is_empty())
        .collect();
    let total = candidates.len();
    if total == 0 {
        return Ok(Json(ImportReportResponse {
            total: 0,
            inserted: 0,
            skipped: 0,
            message: "no candidate rows to import".into(),
        }));
    }

    let existing = existing_isbn_set(registry.book_repository().find_existing_isbns().await?);
    let reconciliation = reconcile(candidates, &existing);
    if reconciliation.to_insert.is_empty() {
        return Ok(Json(ImportReportResponse {
            total,
            inserted: 0,
            skipped: reconciliation.skipped,
            message: format!(
                "nothing to import: all {total} candidates already have their ISBN on record"
            ),
        }));
    }

    let inserted = reconciliation.to_insert.len();
    registry
        .book_repository()
        .create_many(reconciliation.to_insert)
        .await?;
    let message = if reconciliation.skipped > 0 {
        format!(
            "{inserted} books imported, {} skipped as duplicates",
            reconciliation.skipped
        )
    } else {
        format!("{inserted} books imported")
    };
    Ok(Json(ImportReportResponse {
        total,
        inserted,
        skipped: reconciliation.skipped,
        message,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kernel::model::{auth::AccessToken, id::UserId, user::User};
    use kernel::repository::{
        auth::MockAuthRepository, book::MockBookRepository, health::MockHealthCheckRepository,
        loan::MockLoanRepository, user::MockUserRepository,
    };

    use super::*;

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

    fn registry_with_books(book: MockBookRepository) -> AppRegistry {
        AppRegistry::with_repositories(
            Arc::new(book),
            Arc::new(MockLoanRepository::new()),
            Arc::new(MockAuthRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockHealthCheckRepository::new()),
        )
    }

    fn candidate(title: &str, isbn: Option<&str>) -> ImportCandidate {
        ImportCandidate {
            title: title.into(),
            authors: None,
            publisher: None,
            isbn: isbn.map(Into::into),
            year: None,
            category: None,
        }
    }

    #[tokio::test]
    async fn all_duplicates_means_no_insert_call() {
        let mut book = MockBookRepository::new();
        book.expect_find_existing_isbns()
            .times(1)
            .returning(|| Ok(vec!["978-88-04-66823-7".into()]));
        book.expect_create_many().times(0);
        let registry = registry_with_books(book);

        let request = ImportCommitRequest {
            candidates: vec![candidate("Il nome della rosa", Some("9788804668237"))],
        };
        let Json(report) = commit_import(authorized_user(), State(registry), Json(request))
            .await
            .unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.skipped, 1);
        assert!(report.message.starts_with("nothing to import"));
    }

    #[tokio::test]
    async fn empty_commit_is_distinct_from_all_duplicates() {
        let mut book = MockBookRepository::new();
        // neither the dedup fetch nor the insert may run
        book.expect_find_existing_isbns().times(0);
        book.expect_create_many().times(0);
        let registry = registry_with_books(book);

        let request = ImportCommitRequest { candidates: vec![] };
        let Json(report) = commit_import(authorized_user(), State(registry), Json(request))
            .await
            .unwrap();

        assert_eq!(report.total, 0);
        assert_eq!(report.message, "no candidate rows to import");
    }

    #[tokio::test]
    async fn isbn_less_candidates_are_always_inserted() {
        let mut book = MockBookRepository::new();
        book.expect_find_existing_isbns()
            .times(1)
            .returning(|| Ok(vec!["9788804668237".into()]));
        book.expect_create_many()
            .withf(|events| events.len() == 1 && events[0].title == "Senza ISBN")
            .times(1)
            .returning(|_| Ok(()));
        let registry = registry_with_books(book);

        let request = ImportCommitRequest {
            candidates: vec![
                candidate("Il nome della rosa", Some("978-88-04-66823-7")),
                candidate("Senza ISBN", None),
            ],
        };
        let Json(report) = commit_import(authorized_user(), State(registry), Json(request))
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
    }
}
