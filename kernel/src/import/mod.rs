use std::collections::HashSet;

use crate::model::book::event::CreateBook;

pub mod spreadsheet;

/// Deduplication key for a catalog entry: the ISBN with every non-digit
/// stripped, so formatting and punctuation differences collapse.
pub fn normalize_isbn(isbn: Option<&str>) -> String {
    isbn.unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// Builds the lookup set of ISBNs already on record. ISBNs that normalize
/// to nothing carry no identity and are left out.
pub fn existing_isbn_set<I>(isbns: I) -> HashSet<String>
where
    I: IntoIterator<Item = String>,
{
    isbns
        .into_iter()
        .map(|isbn| normalize_isbn(Some(&isbn)))
        .filter(|normalized| !normalized.is_empty())
        .collect()
}

#[derive(Debug)]
pub struct Reconciliation {
    pub to_insert: Vec<CreateBook>,
    pub skipped: usize,
}

/// Drops candidates whose normalized ISBN is already in the catalog. A
/// candidate without a usable ISBN cannot be deduplicated and is always
/// kept.
pub fn reconcile(candidates: Vec<CreateBook>, existing: &HashSet<String>) -> Reconciliation {
    let total = candidates.len();
    let to_insert: Vec<CreateBook> = candidates
        .into_iter()
        .filter(|candidate| {
            let normalized = normalize_isbn(candidate.isbn.as_deref());
            normalized.is_empty() || !existing.contains(&normalized)
        })
        .collect();
    let skipped = total - to_insert.len();
    Reconciliation { to_insert, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, isbn: Option<&str>) -> CreateBook {
        CreateBook {
            title: title.into(),
            authors: None,
            publisher: None,
            isbn: isbn.map(Into::into),
            location: None,
            year: None,
            category: None,
        }
    }

    #[test]
    fn normalize_isbn_strips_every_non_digit() {
        assert_eq!(
            normalize_isbn(Some("978-88-04-66823-7")),
            "9788804668237"
        );
        assert_eq!(normalize_isbn(Some(" 978 88 04 ")), "9788804");
        assert_eq!(normalize_isbn(Some("n/a")), "");
        assert_eq!(normalize_isbn(None), "");
    }

    #[test]
    fn existing_set_drops_unusable_isbns() {
        let set = existing_isbn_set(vec![
            "978-88-04-66823-7".to_string(),
            "".to_string(),
            "---".to_string(),
        ]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("9788804668237"));
    }

    #[test]
    fn reconcile_skips_candidates_already_on_record() {
        let existing = existing_isbn_set(vec!["9788804668237".to_string()]);
        let candidates = vec![
            candidate("Il nome della rosa", Some("978-88-04-66823-7")),
            candidate("Senza ISBN", Some("")),
            candidate("Nuovo arrivo", Some("978-88-07-03300-2")),
        ];

        let reconciliation = reconcile(candidates, &existing);

        assert_eq!(reconciliation.skipped, 1);
        let titles: Vec<&str> = reconciliation
            .to_insert
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Senza ISBN", "Nuovo arrivo"]);
    }

    #[test]
    fn reconcile_with_nothing_left_reports_all_skipped() {
        let existing = existing_isbn_set(vec!["9788804668237".to_string()]);
        let candidates = vec![candidate("Il nome della rosa", Some("9788804668237"))];

        let reconciliation = reconcile(candidates, &existing);

        assert!(reconciliation.to_insert.is_empty());
        assert_eq!(reconciliation.skipped, 1);
    }
}
