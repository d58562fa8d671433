//! Barcode-looking glyphs for 13-digit product codes.
//!
//! These are visual approximations: one bar for every even-positioned digit, with
//! the bar height driven by the digit. There is no symbology encoding, checksum or
//! quiet zone, so scanners will not read them.
//!
//! Two renditions exist and they deliberately use different proportions: a raster
//! image cached on disk ([`synthesize_image`], [`BarcodeCache`]) and vector bars drawn
//! straight onto a page ([`draw_inline`]).

use crate::colour::colours;
use crate::font::Font;
use crate::page::{Page, SpanFont, SpanLayout};
use crate::raster::{save_png, Canvas};
use crate::rect::Rect;
use crate::units::Pt;
use crate::PlacardError;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use id_arena::Id;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub const CODE_LENGTH: usize = 13;

const RASTER_WIDTH: u32 = 200;
const RASTER_HEIGHT: u32 = 80;
const RASTER_MARGIN: u32 = 10;
const RASTER_BAR_WIDTH: u32 = 3;
const CAPTION_SIZE: f32 = 8.0;

/// Exactly 13 ASCII digits
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

fn digits(code: &str) -> impl Iterator<Item = (usize, u32)> + '_ {
    code.bytes().map(|b| (b - b'0') as u32).enumerate()
}

/// Render the 200×80 raster glyph for `code`, or `None` if it is not 13 digits
pub fn synthesize_image(code: &str) -> Option<RgbImage> {
    if !is_valid_code(code) {
        return None;
    }

    let mut canvas = Canvas::new(RASTER_WIDTH, RASTER_HEIGHT);
    let span = (RASTER_WIDTH - 2 * RASTER_MARGIN) as f32;
    let step = span / CODE_LENGTH as f32;

    for (i, digit) in digits(code) {
        if i % 2 != 0 {
            continue;
        }
        let x = RASTER_MARGIN as f32 + i as f32 * step;
        let height = 20 + digit * 4;
        canvas.fill_rect(
            x.floor() as i32,
            RASTER_MARGIN as i32,
            RASTER_BAR_WIDTH,
            height,
            Rgb888::BLACK,
        );
    }

    let caption = format!("EAN-13: {code}");
    let caption_x = (RASTER_WIDTH as i32 - Canvas::text_width(&caption, CAPTION_SIZE)) / 2;
    canvas.text(
        &caption,
        caption_x.max(0),
        RASTER_HEIGHT as i32 - 20,
        CAPTION_SIZE,
        Rgb888::BLACK,
    );

    Some(canvas.into_image())
}

/// Draw vector bars for `code` with their bottom edge at `y`, and the code itself
/// in Helvetica 8 just below. Returns false, drawing nothing, for codes that are not
/// 13 digits.
pub fn draw_inline(
    page: &mut Page,
    caption_font: Id<Font>,
    x: Pt,
    y: Pt,
    code: &str,
    width: Pt,
    height: Pt,
) -> bool {
    if !is_valid_code(code) {
        return false;
    }

    let step = width / CODE_LENGTH as f32;
    for (i, digit) in digits(code).filter(|(i, _)| i % 2 == 0) {
        let bar_height = height * (0.3 + digit as f32 * 0.05);
        page.fill_rect(
            Rect::from_origin(x + step * i as f32, y, step - Pt(1.0), bar_height),
            colours::BLACK,
        );
    }

    page.add_span(SpanLayout {
        text: code.to_string(),
        font: SpanFont {
            id: caption_font,
            size: Pt(CAPTION_SIZE),
        },
        colour: colours::BLACK,
        coords: (x, y - Pt(10.0)),
    });

    true
}

/// Barcode rasters persisted as `barcode_<code>.png`, one per code
#[derive(Clone, Debug)]
pub struct BarcodeCache {
    dir: PathBuf,
}

impl BarcodeCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> BarcodeCache {
        BarcodeCache {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("barcode_{code}.png"))
    }

    pub fn exists(&self, code: &str) -> bool {
        is_valid_code(code) && self.path_for(code).is_file()
    }

    /// Path to the raster for `code`, generating it first if it is not cached yet.
    /// Returns `Ok(None)` for codes that are not 13 digits.
    #[instrument(skip(self))]
    pub fn ensure(&self, code: &str) -> Result<Option<PathBuf>, PlacardError> {
        if !is_valid_code(code) {
            return Ok(None);
        }

        let path = self.path_for(code);
        if path.is_file() {
            debug!(path = %path.display(), "barcode already cached");
            return Ok(Some(path));
        }

        let Some(image) = synthesize_image(code) else {
            return Ok(None);
        };
        save_png(&image, &path)?;
        debug!(path = %path.display(), "barcode generated");
        Ok(Some(path))
    }
}
