//! Raster drawing for label previews and barcode images.
//!
//! A [`Canvas`] is an `embedded-graphics` draw target backed by an in-memory RGB
//! image, so text and rectangles can be drawn without any font files on disk.

use crate::publish::write_atomically;
use crate::PlacardError;
use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10, FONT_9X18_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::convert::Infallible;
use std::path::Path;

pub struct Canvas {
    pixels: RgbImage,
}

/// The bitmap font closest to a requested point size
fn font_for_size(size: f32) -> &'static MonoFont<'static> {
    if size < 14.0 {
        &FONT_6X10
    } else if size < 24.0 {
        &FONT_9X18_BOLD
    } else {
        &FONT_10X20
    }
}

impl Canvas {
    /// A white canvas
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas {
            pixels: RgbImage::from_pixel(width, height, Rgb([255, 255, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Draw `text` with its top-left corner at (x, y)
    pub fn text(&mut self, text: &str, x: i32, y: i32, size: f32, colour: Rgb888) {
        let style = MonoTextStyle::new(font_for_size(size), colour);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    /// Width in pixels `text` takes up at `size`
    pub fn text_width(text: &str, size: f32) -> i32 {
        let font = font_for_size(size);
        let advance = font.character_size.width + font.character_spacing;
        (text.chars().count() as u32 * advance) as i32
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, colour: Rgb888) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(colour))
            .draw(self);
    }

    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbImage {
        self.pixels
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.pixels.dimensions();
        for Pixel(coord, colour) in pixels {
            if coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < w && (coord.y as u32) < h {
                self.pixels.put_pixel(
                    coord.x as u32,
                    coord.y as u32,
                    Rgb([colour.r(), colour.g(), colour.b()]),
                );
            }
        }
        Ok(())
    }
}

/// Encode `image` as PNG at `path`, staged through a temporary file
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), PlacardError> {
    write_atomically(path, |writer| {
        DynamicImage::ImageRgb8(image.clone()).write_to(writer, ImageOutputFormat::Png)?;
        Ok(())
    })
}
