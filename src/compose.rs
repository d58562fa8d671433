//! Draws one record onto one label slot of a page.

use crate::assets::Assets;
use crate::barcode::{self, BarcodeCache};
use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::{BuiltinFont, Font};
use crate::image::Image;
use crate::layout::{truncate, wrap};
use crate::page::{ImageLayout, Page, SpanFont, SpanLayout};
use crate::record::Record;
use crate::rect::Rect;
use crate::style::{FieldStyle, LabelField, StyleConfig, DEFAULT_COLOUR, DEFAULT_SIZE};
use crate::units::Pt;
use crate::validate::parse_price;
use id_arena::Id;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Distance from the top of a label to the first line of text
const TOP_MARGIN: f32 = 50.0;
/// Names longer than this are wrapped instead of truncated
const NAME_WRAP_THRESHOLD: usize = 20;
const NAME_MAX_LINES: usize = 3;

/// A degradation that happened while drawing. None of these stop a label from being
/// produced.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fallback {
    /// The requested font could not be loaded; Helvetica-Bold was used
    DefaultFont { requested: String },
    /// The requested colour was not `#RRGGBB`; black was used
    DefaultColour { requested: String },
    /// The background asset was missing or unreadable; the label has no background
    MissingBackground { name: String },
    /// The barcode raster could not be produced; vector bars were drawn instead
    VectorBarcode { code: String },
    /// The preview could not be drawn; a placeholder image was produced
    PlaceholderPreview { reason: String },
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::DefaultFont { requested } => {
                write!(f, "font {requested:?} unavailable, using Helvetica-Bold")
            }
            Fallback::DefaultColour { requested } => {
                write!(f, "colour {requested:?} malformed, using black")
            }
            Fallback::MissingBackground { name } => write!(f, "background {name:?} unavailable"),
            Fallback::VectorBarcode { code } => {
                write!(f, "barcode image for {code} unavailable, drawing vector bars")
            }
            Fallback::PlaceholderPreview { reason } => write!(f, "preview placeholder: {reason}"),
        }
    }
}

/// Record `fallback`, logging it
pub(crate) fn note(fallbacks: &mut Vec<Fallback>, fallback: Fallback) {
    warn!("{fallback}");
    fallbacks.push(fallback);
}

/// Format a price as Brazilian currency: `R$ 1.234,56`. Text that is not a number is
/// returned as-is.
pub fn format_price(raw: &str) -> String {
    let Some(value) = parse_price(raw).filter(|v| v.is_finite()) else {
        return raw.to_string();
    };

    let fixed = format!("{:.2}", value.abs());
    let (integer, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("R$ {sign}{grouped},{decimals}")
}

/// Composes labels into pages of a single [Document], loading each font and image
/// into the document at most once
pub struct LabelCompositor<'a> {
    assets: &'a Assets,
    barcodes: &'a BarcodeCache,
    builtin_fonts: HashMap<BuiltinFont, Id<Font>>,
    /// Custom fonts by id; `None` when the font could not be loaded
    custom_fonts: HashMap<String, Option<Id<Font>>>,
    images: HashMap<PathBuf, Option<Id<Image>>>,
}

impl<'a> LabelCompositor<'a> {
    pub fn new(assets: &'a Assets, barcodes: &'a BarcodeCache) -> LabelCompositor<'a> {
        LabelCompositor {
            assets,
            barcodes,
            builtin_fonts: HashMap::new(),
            custom_fonts: HashMap::new(),
            images: HashMap::new(),
        }
    }

    fn builtin(&mut self, document: &mut Document, font: BuiltinFont) -> Id<Font> {
        *self
            .builtin_fonts
            .entry(font)
            .or_insert_with(|| document.add_font(Font::Builtin(font)))
    }

    fn custom(&mut self, document: &mut Document, id: &str) -> Option<Id<Font>> {
        if let Some(cached) = self.custom_fonts.get(id) {
            return *cached;
        }

        let loaded = self
            .assets
            .resolve_font(id)
            .and_then(|path| std::fs::read(path).ok())
            .and_then(|bytes| Font::load_truetype(id, bytes).ok())
            .map(|font| document.add_font(font));
        self.custom_fonts.insert(id.to_string(), loaded);
        loaded
    }

    /// The font a field asked for, or Helvetica-Bold
    fn font(
        &mut self,
        document: &mut Document,
        name: &str,
        fallbacks: &mut Vec<Fallback>,
    ) -> Id<Font> {
        if let Some(builtin) = BuiltinFont::from_name(name) {
            return self.builtin(document, builtin);
        }
        match self.custom(document, name) {
            Some(id) => id,
            None => {
                note(
                    fallbacks,
                    Fallback::DefaultFont {
                        requested: name.to_string(),
                    },
                );
                self.builtin(document, BuiltinFont::HelveticaBold)
            }
        }
    }

    fn image(&mut self, document: &mut Document, path: PathBuf) -> Option<Id<Image>> {
        if let Some(cached) = self.images.get(&path) {
            return *cached;
        }
        let loaded = match Image::from_path(&path) {
            Ok(image) => Some(document.add_image(image)),
            Err(err) => {
                warn!(path = %path.display(), "could not load image: {err}");
                None
            }
        };
        self.images.insert(path, loaded);
        loaded
    }

    /// Draw `record` into `rect` on `page`, returning any fallbacks taken
    pub fn compose(
        &mut self,
        document: &mut Document,
        page: &mut Page,
        record: &Record,
        rect: Rect,
        style: &StyleConfig,
    ) -> Vec<Fallback> {
        let mut fallbacks = Vec::new();

        if let Some(name) = style.background.as_deref() {
            let image = self
                .assets
                .resolve_background(name)
                .and_then(|path| self.image(document, path));
            match image {
                Some(image_id) => page.add_image(ImageLayout {
                    image_id,
                    position: rect,
                }),
                None => note(
                    &mut fallbacks,
                    Fallback::MissingBackground {
                        name: name.to_string(),
                    },
                ),
            }
        }

        let x = rect.x1;
        let mut cursor = rect.y2 - Pt(TOP_MARGIN);

        cursor = self.draw_field(
            document,
            page,
            (x + Pt(style.name.x), cursor),
            &record.name,
            &style.name,
            LabelField::Name,
            &mut fallbacks,
        );

        let price_y = cursor - Pt(style.price.spacing);
        cursor = self.draw_field(
            document,
            page,
            (x + Pt(style.price.x), price_y),
            &format_price(&record.price),
            &style.price,
            LabelField::Price,
            &mut fallbacks,
        );

        let date_y = cursor - Pt(style.date.spacing);
        cursor = self.draw_field(
            document,
            page,
            (x + Pt(style.date.x), date_y),
            &format!("Valid until: {}", record.offer_date.trim()),
            &style.date,
            LabelField::Date,
            &mut fallbacks,
        );

        if let Some(code) = record.barcode().filter(|_| style.barcode.visible) {
            let bx = x + Pt(style.barcode.x);
            let by = cursor - Pt(style.barcode.spacing);
            let caption_y = self.draw_barcode(document, page, (bx, by), code, style, &mut fallbacks);

            self.draw_field(
                document,
                page,
                (bx, caption_y),
                &format!("Code: {code}"),
                &style.barcode,
                LabelField::Barcode,
                &mut fallbacks,
            );
        }

        if style.borders {
            page.stroke_rect(rect, colours::BLACK, Pt(1.0));
        }

        fallbacks
    }

    /// Draw the barcode glyph whose top-left sits at `at`, returning where its
    /// caption goes
    fn draw_barcode(
        &mut self,
        document: &mut Document,
        page: &mut Page,
        at: (Pt, Pt),
        code: &str,
        style: &StyleConfig,
        fallbacks: &mut Vec<Fallback>,
    ) -> Pt {
        let (bx, by) = at;
        let width = Pt(style.barcode_image_width);
        let height = Pt(style.barcode_image_height);

        if style.barcode_image && code.chars().count() == barcode::CODE_LENGTH {
            let raster = match self.barcodes.ensure(code) {
                Ok(path) => path.and_then(|path| self.image(document, path)),
                Err(err) => {
                    warn!(code, "could not cache barcode image: {err}");
                    None
                }
            };

            if let Some(image_id) = raster {
                page.add_image(ImageLayout {
                    image_id,
                    position: Rect::from_origin(bx, by - height, width, height),
                });
                return by - height - Pt(5.0);
            }

            note(
                fallbacks,
                Fallback::VectorBarcode {
                    code: code.to_string(),
                },
            );
        }

        let caption_font = self.builtin(document, BuiltinFont::Helvetica);
        barcode::draw_inline(page, caption_font, bx, by - Pt(30.0), code, width, height);
        by
    }

    /// Draw one field's text with its top line at `at`, returning the y below it
    #[allow(clippy::too_many_arguments)]
    fn draw_field(
        &mut self,
        document: &mut Document,
        page: &mut Page,
        at: (Pt, Pt),
        text: &str,
        field_style: &FieldStyle,
        field: LabelField,
        fallbacks: &mut Vec<Fallback>,
    ) -> Pt {
        let (x, y) = at;
        if !field_style.visible {
            return y;
        }

        let size = field_style.size_or(DEFAULT_SIZE);
        let font = SpanFont {
            id: self.font(document, &field_style.font, fallbacks),
            size: Pt(size),
        };
        let requested = field_style.colour_or(DEFAULT_COLOUR);
        let colour = Colour::from_hex(requested).unwrap_or_else(|_| {
            note(
                fallbacks,
                Fallback::DefaultColour {
                    requested: requested.to_string(),
                },
            );
            colours::BLACK
        });

        let mut span = |text: String, y: Pt| {
            page.add_span(SpanLayout {
                text,
                font,
                colour,
                coords: (x, y),
            })
        };

        if field == LabelField::Name && text.trim().chars().count() > NAME_WRAP_THRESHOLD {
            let line_height = Pt(size + 2.0);
            let lines = wrap(text, field_style.max_width, size);
            let drawn = lines.len().min(NAME_MAX_LINES);
            for (i, line) in lines.into_iter().take(NAME_MAX_LINES).enumerate() {
                span(line, y - line_height * i as f32);
            }
            return y - line_height * drawn as f32;
        }

        span(truncate(text, field_style.max_width, size), y);
        y - Pt(size + 10.0)
    }
}
