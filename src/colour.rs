use crate::PlacardError;
use embedded_graphics::pixelcolor::Rgb888;

/// A colour, expressed in the RGB or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse a `#RRGGBB` hex string. The leading `#` is required, as it is what
    /// style configurations send; anything else is rejected.
    pub fn from_hex(hex: &str) -> Result<Colour, PlacardError> {
        let invalid = || PlacardError::InvalidColour(hex.to_string());
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Colour::new_rgb_bytes(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse either `#RRGGBB` or one of the basic HTML colour names, as raster
    /// previews accept both
    pub fn from_hex_or_name(value: &str) -> Result<Colour, PlacardError> {
        let (r, g, b) = match value.trim().to_ascii_lowercase().as_str() {
            "black" => (0, 0, 0),
            "silver" => (192, 192, 192),
            "gray" | "grey" => (128, 128, 128),
            "white" => (255, 255, 255),
            "maroon" => (128, 0, 0),
            "red" => (255, 0, 0),
            "purple" => (128, 0, 128),
            "fuchsia" | "magenta" => (255, 0, 255),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "olive" => (128, 128, 0),
            "yellow" => (255, 255, 0),
            "navy" => (0, 0, 128),
            "blue" => (0, 0, 255),
            "teal" => (0, 128, 128),
            "aqua" | "cyan" => (0, 255, 255),
            "orange" => (255, 165, 0),
            _ => return Colour::from_hex(value),
        };
        Ok(Colour::new_rgb_bytes(r, g, b))
    }

    /// Convert to an 8-bit colour for raster drawing
    pub fn to_rgb888(self) -> Rgb888 {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Colour::RGB { r, g, b } => Rgb888::new(byte(r), byte(g), byte(b)),
            Colour::Grey { g } => Rgb888::new(byte(g), byte(g), byte(g)),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
}
