use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use shared::error::{AppError, AppResult};

use crate::model::book::event::CreateBook;

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
const SPREADSHEET_EPOCH_OFFSET_DAYS: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

// Accepted header spellings per field, probed in order. Extend the lists to
// accept more spellings; parsing is untouched by it.
const TITLE_COLUMNS: &[&str] = &["Titolo", "titolo", "TITOLO"];
const AUTHORS_COLUMNS: &[&str] = &["Autori", "autori", "AUTORI", "Autore"];
const PUBLISHER_COLUMNS: &[&str] = &["Editore", "editore", "EDITORE"];
const ISBN_COLUMNS: &[&str] = &["ISBN", "isbn", "Isbn"];
const YEAR_COLUMNS: &[&str] = &[
    "Anno",
    "anno",
    "Data di pubblicazione",
    "Data di Pubblicazione",
    "Data pubblicazione",
    "data_pubblicazione",
];
const CATEGORY_COLUMNS: &[&str] = &[
    "Categoria",
    "categoria",
    "CATEGORIA",
    "Categorie",
    "categorie",
    "Genere",
    "genere",
];

/// Parses the first sheet of an uploaded workbook into catalog candidates.
/// Rows without a usable title are dropped; unparseable year cells degrade
/// to `None` instead of failing the row.
pub fn parse_catalog_sheet(bytes: &[u8]) -> AppResult<Vec<CreateBook>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::UnprocessableEntity(format!("could not read spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::UnprocessableEntity("spreadsheet has no sheets".into()))?
        .map_err(|e| {
            AppError::UnprocessableEntity(format!("could not read the first sheet: {e}"))
        })?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = column_index(header_row);
    Ok(rows
        .filter_map(|row| candidate_from_row(&columns, row))
        .collect())
}

fn column_index(header_row: &[Data]) -> HashMap<String, usize> {
    header_row
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            let name = cell_text(cell);
            (!name.is_empty()).then_some((name, index))
        })
        .collect()
}

fn candidate_from_row(columns: &HashMap<String, usize>, row: &[Data]) -> Option<CreateBook> {
    let title = resolve_text(columns, row, TITLE_COLUMNS)?;
    Some(CreateBook {
        title,
        authors: resolve_text(columns, row, AUTHORS_COLUMNS),
        publisher: resolve_text(columns, row, PUBLISHER_COLUMNS),
        isbn: resolve_text(columns, row, ISBN_COLUMNS),
        // shelf locations are assigned once the books are physically placed
        location: None,
        year: parse_year(resolve(columns, row, YEAR_COLUMNS)),
        category: resolve_text(columns, row, CATEGORY_COLUMNS),
    })
}

/// First alias whose cell holds a non-empty value wins.
fn resolve<'a>(
    columns: &HashMap<String, usize>,
    row: &'a [Data],
    aliases: &[&str],
) -> Option<&'a Data> {
    aliases.iter().find_map(|alias| {
        let &index = columns.get(*alias)?;
        let cell = row.get(index)?;
        (!cell_text(cell).is_empty()).then_some(cell)
    })
}

fn resolve_text(
    columns: &HashMap<String, usize>,
    row: &[Data],
    aliases: &[&str],
) -> Option<String> {
    resolve(columns, row, aliases).map(cell_text)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // ISBNs and years come through as floats; keep integral ones exact
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn parse_year(cell: Option<&Data>) -> Option<i32> {
    match cell? {
        Data::Int(i) => year_from_number(*i as f64),
        Data::Float(f) => year_from_number(*f),
        Data::DateTime(dt) => year_from_number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) => year_from_text(s),
        _ => None,
    }
}

fn year_from_number(value: f64) -> Option<i32> {
    if (1000.0..=2100.0).contains(&value) {
        return Some(value.trunc() as i32);
    }
    // numbers outside the plausible range are date serials
    let seconds = (value - SPREADSHEET_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY;
    DateTime::from_timestamp(seconds as i64, 0).map(|datetime| datetime.year())
}

fn year_from_text(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if is_digits(value) && value.len() == 4 {
        return value.parse().ok();
    }
    if let Some(year) = slash_date_year(value) {
        return Some(year);
    }
    value
        .parse::<NaiveDate>()
        .map(|date| date.year())
        .or_else(|_| value.parse::<NaiveDateTime>().map(|datetime| datetime.year()))
        .ok()
}

/// `D/M/YYYY` and `DD/MM/YYYY` forms yield their trailing year component.
fn slash_date_year(value: &str) -> Option<i32> {
    let mut parts = value.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let day_or_month = |part: &str| is_digits(part) && (1..=2).contains(&part.len());
    if !day_or_month(day) || !day_or_month(month) || !(is_digits(year) && year.len() == 4) {
        return None;
    }
    year.parse().ok()
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> HashMap<String, usize> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.to_string(), index))
            .collect()
    }

    #[test]
    fn year_in_plausible_range_is_truncated() {
        assert_eq!(year_from_number(2020.0), Some(2020));
        assert_eq!(year_from_number(1987.6), Some(1987));
        assert_eq!(year_from_number(1000.0), Some(1000));
        assert_eq!(year_from_number(2100.0), Some(2100));
    }

    #[test]
    fn out_of_range_number_is_a_date_serial() {
        // serial 45000 is 2023-03-15
        assert_eq!(year_from_number(45000.0), Some(2023));
        // serial 366 lands in 1900
        assert_eq!(year_from_number(366.0), Some(1900));
    }

    #[test]
    fn textual_years_and_dates_resolve() {
        assert_eq!(year_from_text("2020"), Some(2020));
        assert_eq!(year_from_text(" 2020 "), Some(2020));
        assert_eq!(year_from_text("15/03/2020"), Some(2020));
        assert_eq!(year_from_text("5/3/1999"), Some(1999));
        assert_eq!(year_from_text("2020-05-01"), Some(2020));
        assert_eq!(year_from_text("not a date"), None);
        assert_eq!(year_from_text(""), None);
        assert_eq!(year_from_text("123/4/2020"), None);
    }

    #[test]
    fn integral_float_cells_keep_their_digits() {
        assert_eq!(cell_text(&Data::Float(9788804668237.0)), "9788804668237");
        assert_eq!(cell_text(&Data::Float(0.5)), "0.5");
        assert_eq!(cell_text(&Data::String("  x  ".into())), "x");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn rows_without_a_title_are_dropped() {
        let columns = columns(&["Titolo", "Autori"]);
        let row = vec![Data::Empty, Data::String("Umberto Eco".into())];
        assert_eq!(candidate_from_row(&columns, &row), None);

        let blank = vec![Data::String("   ".into()), Data::String("Eco".into())];
        assert_eq!(candidate_from_row(&columns, &blank), None);
    }

    #[test]
    fn first_non_empty_alias_wins() {
        let columns = columns(&["TITOLO", "Categoria", "Genere", "Data di pubblicazione"]);
        let row = vec![
            Data::String("Il nome della rosa".into()),
            Data::Empty,
            Data::String("Romanzo".into()),
            Data::Float(45000.0),
        ];

        let candidate = candidate_from_row(&columns, &row).unwrap();
        assert_eq!(candidate.title, "Il nome della rosa");
        assert_eq!(candidate.category.as_deref(), Some("Romanzo"));
        assert_eq!(candidate.year, Some(2023));
        assert_eq!(candidate.isbn, None);
        assert_eq!(candidate.location, None);
    }

    #[test]
    fn alternate_author_heading_is_accepted() {
        let columns = columns(&["Titolo", "Autore", "Anno"]);
        let row = vec![
            Data::String("Baudolino".into()),
            Data::String("Umberto Eco".into()),
            Data::String("15/03/2020".into()),
        ];

        let candidate = candidate_from_row(&columns, &row).unwrap();
        assert_eq!(candidate.authors.as_deref(), Some("Umberto Eco"));
        assert_eq!(candidate.year, Some(2020));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(parse_catalog_sheet(b"definitely not a workbook").is_err());
    }
}
