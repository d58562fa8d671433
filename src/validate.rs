//! Required-field rules for product records.

use crate::record::Record;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Price,
    OfferDate,
    Barcode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::OfferDate => "offer_date",
            Field::Barcode => "barcode",
        })
    }
}

/// A single rule a record broke
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ValidationIssue {
    pub field: Field,
    pub message: &'static str,
}

impl ValidationIssue {
    fn new(field: Field, message: &'static str) -> ValidationIssue {
        ValidationIssue { field, message }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Issues found in one row of a batch
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct RowIssues {
    /// Spreadsheet line, counting the header as line 1
    pub line: usize,
    pub issues: Vec<ValidationIssue>,
}

/// Check every rule against `record`, returning all the issues found. An empty result
/// means the record can be printed.
pub fn validate(record: &Record) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let name = record.name.trim();
    if name.is_empty() {
        issues.push(ValidationIssue::new(Field::Name, "name blank"));
    } else if name.chars().count() < 2 {
        issues.push(ValidationIssue::new(Field::Name, "name too short"));
    }

    let price = record.price.trim();
    if price.is_empty() {
        issues.push(ValidationIssue::new(Field::Price, "price blank"));
    } else if parse_price(price).is_none() {
        issues.push(ValidationIssue::new(Field::Price, "price invalid"));
    }

    let date = record.offer_date.trim();
    if date.is_empty() {
        issues.push(ValidationIssue::new(Field::OfferDate, "date blank"));
    } else if !is_date_shaped(date) {
        issues.push(ValidationIssue::new(Field::OfferDate, "date wrong format"));
    } else if !NaiveDate::parse_from_str(date, "%d/%m/%Y").is_ok_and(|d| d.year() >= 1) {
        issues.push(ValidationIssue::new(Field::OfferDate, "date invalid"));
    }

    if let Some(code) = record.barcode() {
        if code.len() != 13 || !code.bytes().all(|b| b.is_ascii_digit()) {
            issues.push(ValidationIssue::new(
                Field::Barcode,
                "barcode must be 13 digits",
            ));
        }
    }

    issues
}

/// Validate a whole batch, returning only the rows with problems
pub fn validate_batch(records: &[Record]) -> Vec<RowIssues> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let issues = validate(record);
            (!issues.is_empty()).then_some(RowIssues {
                line: index + 2,
                issues,
            })
        })
        .collect()
}

/// Parse a price written with either a decimal point or a decimal comma
pub fn parse_price(price: &str) -> Option<f64> {
    price.trim().replace(',', ".").parse::<f64>().ok()
}

/// `dd/mm/yyyy` with ASCII digits only
fn is_date_shaped(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good() -> Record {
        Record::new("Arroz 5kg", "24,90", "15/03/2024")
    }

    fn messages(record: &Record) -> Vec<&'static str> {
        validate(record).into_iter().map(|i| i.message).collect()
    }

    #[test]
    fn valid_record_has_no_issues() {
        assert!(validate(&good()).is_empty());
        assert!(validate(&good().with_barcode("7891234567890")).is_empty());
        assert!(validate(&good().with_barcode("   ")).is_empty());
    }

    #[test]
    fn name_rules() {
        let mut record = good();
        record.name = "   ".into();
        let issues = validate(&record);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, Field::Name);
        assert_eq!(issues[0].message, "name blank");

        record.name = " é ".into();
        assert_eq!(messages(&record), vec!["name too short"]);
    }

    #[test]
    fn price_rules() {
        let mut record = good();
        record.price = "".into();
        assert_eq!(messages(&record), vec!["price blank"]);
        record.price = "doze".into();
        assert_eq!(messages(&record), vec!["price invalid"]);
        record.price = " 12.5 ".into();
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn date_rules() {
        let mut record = good();
        record.offer_date = "31/02/2024".into();
        assert_eq!(messages(&record), vec!["date invalid"]);
        record.offer_date = "2024/02/31".into();
        assert_eq!(messages(&record), vec!["date wrong format"]);
        record.offer_date = "1/2/2024".into();
        assert_eq!(messages(&record), vec!["date wrong format"]);
        record.offer_date = "01/01/0000".into();
        assert_eq!(messages(&record), vec!["date invalid"]);
        record.offer_date = "29/02/2024".into();
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn barcode_must_be_thirteen_digits() {
        for code in ["123", "78912345678901", "789123456789X", "７891234567890"] {
            let issues = validate(&good().with_barcode(code));
            assert_eq!(issues.len(), 1, "{code}");
            assert_eq!(issues[0].field, Field::Barcode);
        }
    }

    #[test]
    fn all_rules_are_reported() {
        let record = Record::new("", "", "");
        assert_eq!(
            messages(&record.with_barcode("1")),
            vec!["name blank", "price blank", "date blank", "barcode must be 13 digits"]
        );
    }

    #[test]
    fn batch_rows_are_numbered_from_the_header() {
        let mut bad = good();
        bad.price = "".into();
        let rows = validate_batch(&[good(), bad, good()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 3);
    }
}
