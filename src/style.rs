//! Per-field label styling, built once from the flat key/value map that style files
//! and saved profiles carry.

use crate::layout::PageSizePolicy;
use serde_json::{Map, Value};
use tracing::warn;

pub const DEFAULT_FONT: &str = "Helvetica-Bold";
pub const DEFAULT_SIZE: f32 = 12.0;
pub const DEFAULT_COLOUR: &str = "#000000";

/// The four fields printed on a label
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LabelField {
    Name,
    Price,
    Date,
    Barcode,
}

impl LabelField {
    /// Key prefix used by style maps
    pub fn prefix(&self) -> &'static str {
        match self {
            LabelField::Name => "nome",
            LabelField::Price => "valor",
            LabelField::Date => "data",
            LabelField::Barcode => "codigo",
        }
    }

    fn default_spacing(&self) -> f32 {
        match self {
            LabelField::Name => 0.0,
            LabelField::Price | LabelField::Date => 10.0,
            LabelField::Barcode => 20.0,
        }
    }
}

/// How one field is drawn. `size`, `colour` and `y` stay optional because documents and
/// previews default them differently.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldStyle {
    pub visible: bool,
    pub font: String,
    pub size: Option<f32>,
    pub colour: Option<String>,
    pub x: f32,
    pub y: Option<f32>,
    pub max_width: f32,
    /// Vertical gap above the field
    pub spacing: f32,
}

impl FieldStyle {
    fn from_map(map: &Map<String, Value>, field: LabelField) -> FieldStyle {
        let p = field.prefix();
        FieldStyle {
            visible: bool_key(map, &format!("{p}_visivel")).unwrap_or(true),
            font: string_key(map, &format!("fonte_{p}")).unwrap_or_else(|| DEFAULT_FONT.into()),
            size: number_key(map, &format!("fonte_tamanho_{p}")),
            colour: string_key(map, &format!("{p}_cor")),
            x: number_key(map, &format!("{p}_x")).unwrap_or(20.0),
            y: number_key(map, &format!("{p}_y")),
            max_width: number_key(map, &format!("{p}_largura")).unwrap_or(300.0),
            spacing: number_key(map, &format!("{p}_espacamento"))
                .unwrap_or_else(|| field.default_spacing()),
        }
    }

    pub fn size_or(&self, default: f32) -> f32 {
        self.size.unwrap_or(default)
    }

    pub fn colour_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.colour.as_deref().unwrap_or(default)
    }
}

/// Everything that controls how a batch of labels looks
#[derive(Clone, PartialEq, Debug)]
pub struct StyleConfig {
    pub name: FieldStyle,
    pub price: FieldStyle,
    pub date: FieldStyle,
    pub barcode: FieldStyle,
    pub page_size: PageSizePolicy,
    /// Background asset file name; `None` for the plain default
    pub background: Option<String>,
    pub borders: bool,
    /// Draw barcodes from cached PNG rasters instead of vector bars
    pub barcode_image: bool,
    pub barcode_image_width: f32,
    pub barcode_image_height: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig::from_map(&Map::new())
    }
}

impl StyleConfig {
    /// Build a style from a flat map. Absent keys take their defaults and unknown keys
    /// are ignored.
    pub fn from_map(map: &Map<String, Value>) -> StyleConfig {
        let page_size = match string_key(map, "tamanho") {
            None => PageSizePolicy::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("{err}, using {}", PageSizePolicy::default());
                PageSizePolicy::default()
            }),
        };

        let background = string_key(map, "fundo")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && name != "padrao");

        StyleConfig {
            name: FieldStyle::from_map(map, LabelField::Name),
            price: FieldStyle::from_map(map, LabelField::Price),
            date: FieldStyle::from_map(map, LabelField::Date),
            barcode: FieldStyle::from_map(map, LabelField::Barcode),
            page_size,
            background,
            borders: bool_key(map, "bordas").unwrap_or(true),
            barcode_image: bool_key(map, "usar_imagem_codigo").unwrap_or(false),
            barcode_image_width: number_key(map, "codigo_largura_imagem").unwrap_or(120.0),
            barcode_image_height: number_key(map, "codigo_altura_imagem").unwrap_or(30.0),
        }
    }

    /// Parse a JSON object; anything that is not an object yields the default style
    pub fn from_json(value: &Value) -> StyleConfig {
        match value.as_object() {
            Some(map) => StyleConfig::from_map(map),
            None => {
                warn!("style is not a JSON object, using defaults");
                StyleConfig::default()
            }
        }
    }
}

fn string_key(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_key(map: &Map<String, Value>, key: &str) -> Option<f32> {
    let value = match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).map(|v| v as f32)
}

fn bool_key(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_map_gives_defaults() {
        let style = StyleConfig::default();
        assert_eq!(style.page_size, PageSizePolicy::A4);
        assert!(style.borders);
        assert!(!style.barcode_image);
        assert_eq!(style.background, None);
        assert_eq!(style.name.font, DEFAULT_FONT);
        assert_eq!(style.name.x, 20.0);
        assert_eq!(style.name.max_width, 300.0);
        assert_eq!(style.price.spacing, 10.0);
        assert_eq!(style.date.spacing, 10.0);
        assert_eq!(style.barcode.spacing, 20.0);
        assert_eq!(style.barcode_image_width, 120.0);
        assert_eq!(style.barcode_image_height, 30.0);
        assert_eq!(style.price.size_or(DEFAULT_SIZE), 12.0);
    }

    #[test]
    fn lenient_values() {
        let style = StyleConfig::from_json(&json!({
            "tamanho": "A6",
            "fundo": "padrao",
            "bordas": "false",
            "valor_visivel": false,
            "fonte_tamanho_valor": "32",
            "valor_cor": "#FF0000",
            "nome_x": 40,
            "codigo_espacamento": 35.5,
            "something_else": [1, 2, 3]
        }));
        assert_eq!(style.page_size, PageSizePolicy::A6);
        assert_eq!(style.background, None);
        assert!(!style.borders);
        assert!(!style.price.visible);
        assert_eq!(style.price.size, Some(32.0));
        assert_eq!(style.price.colour_or(DEFAULT_COLOUR), "#FF0000");
        assert_eq!(style.name.x, 40.0);
        assert_eq!(style.barcode.spacing, 35.5);
    }

    #[test]
    fn unknown_page_size_falls_back_to_a4() {
        let style = StyleConfig::from_json(&json!({ "tamanho": "Letter" }));
        assert_eq!(style.page_size, PageSizePolicy::A4);
    }

    #[test]
    fn background_name_is_kept() {
        let style = StyleConfig::from_json(&json!({ "fundo": "promo.png" }));
        assert_eq!(style.background.as_deref(), Some("promo.png"));
    }
}
