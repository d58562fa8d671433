use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::PlacardError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf, Ref};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single run of text drawn with one font and colour, starting at `coords` (the
/// baseline origin)
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// An image stretched to fill `position`
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Image(ImageLayout),
    FilledRect { rect: Rect, colour: Colour },
    StrokedRect { rect: Rect, colour: Colour, width: Pt },
}

/// One physical sheet of the output document
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Everything drawn on the page, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: PageSize) -> Page {
        Page {
            media_box: Rect::from_origin(Pt(0.0), Pt(0.0), size.0, size.1),
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        self.contents.push(PageContents::FilledRect { rect, colour });
    }

    pub fn stroke_rect(&mut self, rect: Rect, colour: Colour, width: Pt) {
        self.contents
            .push(PageContents::StrokedRect { rect, colour, width });
    }

    /// All text spans on the page, in drawing order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Text(span) => Some(span),
            _ => None,
        })
    }

    /// Find the first span whose text starts with `prefix`
    pub fn span_starting_with(&self, prefix: &str) -> Option<&SpanLayout> {
        self.spans().find(|span| span.text.starts_with(prefix))
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), PlacardError> {
        let id = refs.get(RefType::Page(page_index)).ok_or(PlacardError::PageMissing)?;
        let parent = refs.get(RefType::PageTree).ok_or(PlacardError::PageMissing)?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(font_id.index())) {
                resource_fonts.pair(Name(format!("F{}", font_id.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (image_id, _) in images.iter() {
            let image_ref: Option<Ref> = refs.get(RefType::Image(image_id.index()));
            if let Some(image_ref) = image_ref {
                resource_xobjects.pair(Name(format!("I{}", image_id.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_contents(&self.contents, fonts)?;
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            &rendered,
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(content_id, compressed.as_slice())
            .filter(pdf_writer::Filter::FlateDecode);

        Ok(())
    }
}
