use serde::{Deserialize, Serialize};

/// One product to print a label for, as read from the input table
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    /// Decimal-like text, either `1234.5` or `1234,5`
    pub price: String,
    /// `dd/mm/yyyy`
    pub offer_date: String,
    #[serde(default)]
    pub barcode: Option<String>,
}

impl Record {
    pub fn new<N: ToString, P: ToString, D: ToString>(name: N, price: P, offer_date: D) -> Record {
        Record {
            name: name.to_string(),
            price: price.to_string(),
            offer_date: offer_date.to_string(),
            barcode: None,
        }
    }

    pub fn with_barcode<S: ToString>(mut self, barcode: S) -> Record {
        self.barcode = Some(barcode.to_string());
        self
    }

    /// The barcode, if one is present and non-blank
    pub fn barcode(&self) -> Option<&str> {
        self.barcode
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}
