//! Reading product tables from disk.
//!
//! Column headers are matched case-insensitively against a table of synonyms, so
//! spreadsheets exported with Portuguese or English headers both work.

use crate::record::Record;
use crate::validate::Field;
use crate::PlacardError;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};

const SYNONYMS: &[(&str, Field)] = &[
    ("nome do produto", Field::Name),
    ("produto", Field::Name),
    ("descrição", Field::Name),
    ("descricao", Field::Name),
    ("name", Field::Name),
    ("preço", Field::Price),
    ("preco", Field::Price),
    ("valor", Field::Price),
    ("price", Field::Price),
    ("data da oferta", Field::OfferDate),
    ("data", Field::OfferDate),
    ("validade", Field::OfferDate),
    ("data validade", Field::OfferDate),
    ("date", Field::OfferDate),
    ("codigo de barras", Field::Barcode),
    ("código de barras", Field::Barcode),
    ("ean", Field::Barcode),
    ("upc", Field::Barcode),
    ("barcode", Field::Barcode),
];

/// The record field a column header refers to, if any
pub fn canonical_column(header: &str) -> Option<Field> {
    let header = header.trim().to_lowercase();
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == header)
        .map(|(_, field)| *field)
}

/// Read every record from a `.csv` or `.json` file
#[instrument]
pub fn read_records(path: &Path) -> Result<Vec<Record>, PlacardError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => parse_csv(&std::fs::read_to_string(path)?)?,
        "json" => parse_json(&std::fs::read_to_string(path)?)?,
        _ => return Err(PlacardError::UnsupportedFormat(extension)),
    };

    debug!(count = records.len(), "records read");
    Ok(records)
}

/// Column positions of each record field in a table
#[derive(Default)]
struct Columns {
    name: Option<usize>,
    price: Option<usize>,
    offer_date: Option<usize>,
    barcode: Option<usize>,
}

impl Columns {
    fn from_headers<'h, I: IntoIterator<Item = &'h str>>(headers: I) -> Result<Columns, PlacardError> {
        let mut columns = Columns::default();
        for (i, header) in headers.into_iter().enumerate() {
            let slot = match canonical_column(header) {
                Some(Field::Name) => &mut columns.name,
                Some(Field::Price) => &mut columns.price,
                Some(Field::OfferDate) => &mut columns.offer_date,
                Some(Field::Barcode) => &mut columns.barcode,
                None => continue,
            };
            slot.get_or_insert(i);
        }

        if columns.name.is_none() {
            return Err(PlacardError::MissingColumn("name"));
        }
        if columns.price.is_none() {
            return Err(PlacardError::MissingColumn("price"));
        }
        if columns.offer_date.is_none() {
            return Err(PlacardError::MissingColumn("offer_date"));
        }
        Ok(columns)
    }

    fn record<F: Fn(usize) -> String>(&self, cell: F) -> Record {
        let get = |column: Option<usize>| column.map(&cell).unwrap_or_default();
        let barcode = get(self.barcode);
        Record {
            name: get(self.name),
            price: get(self.price),
            offer_date: get(self.offer_date),
            barcode: (!barcode.trim().is_empty()).then(|| barcode.trim().to_string()),
        }
    }
}

/// Split CSV text into rows of cells. Cells may be double-quoted, with `""` standing
/// for a literal quote; quoted cells can span lines.
fn csv_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if cell.is_empty() => quoted = true,
            (',', false) => row.push(std::mem::take(&mut cell)),
            ('\r', false) => {}
            ('\n', false) => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            (ch, _) => cell.push(ch),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    rows.retain(|row| row.iter().any(|cell| !cell.trim().is_empty()));
    rows
}

fn parse_csv(text: &str) -> Result<Vec<Record>, PlacardError> {
    let mut rows = csv_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Err(PlacardError::MissingColumn("name"));
    };
    let columns = Columns::from_headers(header.iter().map(String::as_str))?;

    Ok(rows
        .map(|row| columns.record(|i| row.get(i).cloned().unwrap_or_default()))
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_json(text: &str) -> Result<Vec<Record>, PlacardError> {
    let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(text)?;

    let mut keys: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if !keys.contains(&key.as_str()) {
            keys.push(key);
        }
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let columns = Columns::from_headers(keys.iter().copied())?;

    Ok(rows
        .iter()
        .map(|row| columns.record(|i| row.get(keys[i]).map(cell_text).unwrap_or_default()))
        .collect())
}
