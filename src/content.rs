//! Turns the high-level contents of a [`Page`](crate::Page) into PDF content stream
//! operators.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{PageContents, SpanLayout};
use crate::rect::Rect;
use id_arena::Arena;
use std::io::Write;

#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(span) => render_span(&mut content, span, fonts)?,
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    image.position.width(),
                    image.position.height(),
                    image.position.x1,
                    image.position.y1
                )?;
                write!(&mut content, "/I{} Do\n", image.image_id.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::FilledRect { rect, colour } => {
                write!(&mut content, "q\n")?;
                write_colour(&mut content, *colour, false)?;
                write_rect(&mut content, rect)?;
                write!(&mut content, "f\nQ\n")?;
            }
            PageContents::StrokedRect {
                rect,
                colour,
                width,
            } => {
                write!(&mut content, "q\n")?;
                write_colour(&mut content, *colour, true)?;
                write!(&mut content, "{} w\n", width)?;
                write_rect(&mut content, rect)?;
                write!(&mut content, "S\nQ\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_span(
    content: &mut Vec<u8>,
    span: &SpanLayout,
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(font) = fonts.get(span.font.id) else {
        return Ok(());
    };
    if span.text.is_empty() {
        return Ok(());
    }

    write!(content, "q\n")?;
    write_colour(content, span.colour, false)?;
    write!(content, "BT\n")?;
    write!(content, "/F{} {} Tf\n", span.font.id.index(), span.font.size)?;
    write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
    write!(content, "<")?;
    for byte in font.encode(&span.text) {
        write!(content, "{byte:02x}")?;
    }
    write!(content, "> Tj\n")?;
    write!(content, "ET\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_rect(content: &mut Vec<u8>, rect: &Rect) -> Result<(), std::io::Error> {
    write!(
        content,
        "{} {} {} {} re\n",
        rect.x1,
        rect.y1,
        rect.width(),
        rect.height()
    )
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour, stroke: bool) -> Result<(), std::io::Error> {
    match (colour, stroke) {
        (Colour::RGB { r, g, b }, false) => write!(content, "{r} {g} {b} rg\n"),
        (Colour::RGB { r, g, b }, true) => write!(content, "{r} {g} {b} RG\n"),
        (Colour::Grey { g }, false) => write!(content, "{g} g\n"),
        (Colour::Grey { g }, true) => write!(content, "{g} G\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;
    use crate::page::SpanFont;
    use crate::units::Pt;
    use crate::colours;

    #[test]
    fn spans_become_hex_encoded_text_operators() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(Font::Builtin(BuiltinFont::HelveticaBold));
        let contents = vec![PageContents::Text(SpanLayout {
            text: "Hi".into(),
            font: SpanFont { id, size: Pt(12.0) },
            colour: colours::BLACK,
            coords: (Pt(20.0), Pt(30.0)),
        })];

        let out = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert!(out.contains("/F0 12 Tf"));
        assert!(out.contains("20 30 Td"));
        assert!(out.contains("<4869> Tj"));
    }

    #[test]
    fn rectangles_fill_and_stroke() {
        let fonts: Arena<Font> = Arena::new();
        let rect = Rect::from_origin(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0));
        let contents = vec![
            PageContents::FilledRect {
                rect,
                colour: colours::BLACK,
            },
            PageContents::StrokedRect {
                rect,
                colour: colours::BLACK,
                width: Pt(1.0),
            },
        ];

        let out = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert!(out.contains("1 2 3 4 re\nf"));
        assert!(out.contains("0 G\n1 w\n1 2 3 4 re\nS"));
    }
}
