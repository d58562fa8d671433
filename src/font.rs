use crate::{
    refs::{ObjectReferences, RefType},
    PlacardError,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, Face, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// The standard PDF fonts that every viewer ships with. These are never embedded.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    Courier,
    TimesRoman,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 4] = [
        BuiltinFont::HelveticaBold,
        BuiltinFont::Helvetica,
        BuiltinFont::Courier,
        BuiltinFont::TimesRoman,
    ];

    /// Look up a built-in font by its PostScript name, e.g. `Helvetica-Bold`
    pub fn from_name(name: &str) -> Option<BuiltinFont> {
        BuiltinFont::ALL
            .into_iter()
            .find(|font| font.base_name() == name)
    }

    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::TimesRoman => "Times-Roman",
        }
    }
}

/// A parsed TrueType/OpenType font supplied by the user. The whole font file is
/// embedded in the generated PDF as a CID-keyed font.
pub struct TrueTypeFont {
    /// The identifier the style configuration used to ask for this font
    pub id: String,
    pub face: OwnedFace,
}

/// A font that text spans on a page can refer to
pub enum Font {
    Builtin(BuiltinFont),
    TrueType(TrueTypeFont),
}

impl Font {
    /// Parse raw font bytes, returning an error if they are not a usable font
    pub fn load_truetype<S: ToString>(id: S, bytes: Vec<u8>) -> Result<Font, PlacardError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font::TrueType(TrueTypeFont {
            id: id.to_string(),
            face,
        }))
    }

    /// Encode text into the bytes a content stream string operand needs for this font:
    /// single WinAnsi bytes for built-in fonts, big-endian glyph ids for embedded ones.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Font::Builtin(_) => text.chars().map(win_ansi_byte).collect(),
            Font::TrueType(font) => text
                .chars()
                .flat_map(|ch| font.glyph_id_or_replacement(ch).to_be_bytes())
                .collect(),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        match self {
            Font::Builtin(builtin) => {
                let font_id = refs.gen(RefType::Font(font_index));
                let mut font = writer.type1_font(font_id);
                font.base_font(Name(builtin.base_name().as_bytes()));
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            Font::TrueType(truetype) => truetype.write(refs, font_index, writer),
        }
    }
}

/// Map a character to its WinAnsiEncoding code, substituting `?` for anything the
/// encoding cannot represent
fn win_ansi_byte(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}

impl TrueTypeFont {
    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    fn glyph_id_or_replacement(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
            .unwrap_or(0)
    }

    fn postscript_name(&self) -> String {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::POST_SCRIPT_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_else(|| self.id.clone())
    }

    fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));
        let scaling = 1000.0 / self.face().units_per_em() as f32;

        let mut advances: Vec<(u16, f32)> = self
            .glyph_ids()
            .keys()
            .filter_map(|&gid| {
                self.face()
                    .glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                    .map(|adv| (gid, adv as f32 * scaling))
            })
            .collect();
        advances.sort_by_key(|&(gid, _)| gid);

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);
        cid_font.default_width(1000.0);

        // group consecutive glyph ids into runs so the widths array stays compact
        let mut widths = cid_font.widths();
        let mut run_start: Option<u16> = None;
        let mut run: Vec<f32> = Vec::new();
        for (gid, width) in advances {
            match run_start {
                Some(start) if start as usize + run.len() == gid as usize => run.push(width),
                Some(start) => {
                    widths.consecutive(start, run.drain(..));
                    run_start = Some(gid);
                    run.push(width);
                }
                None => {
                    run_start = Some(gid);
                    run.push(width);
                }
            }
        }
        if let Some(start) = run_start {
            widths.consecutive(start, run.drain(..));
        }
        widths.finish();

        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(font_data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let global_bbox = face.global_bounding_box();

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let name = self.postscript_name();
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        descriptor.flags(flags);
        descriptor.bbox(pdf_writer::Rect {
            x1: global_bbox.x_min as f32 * scaling,
            y1: global_bbox.y_min as f32 * scaling,
            x2: global_bbox.x_max as f32 * scaling,
            y2: global_bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(0.0);
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(face.ascender() as f32 * scaling),
        );
        descriptor.stem_v(80.0);
        descriptor.font_file2(font_data_id);

        id
    }

    /// Every glyph id reachable from a unicode cmap subtable, with the first char
    /// that maps to it
    fn glyph_ids(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();
        let Some(cmap) = self.face().tables().cmap else {
            return map;
        };

        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut ids: Vec<(u16, char)> = self.glyph_ids().into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // bfchar blocks hold at most 100 entries
        for block in ids.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let mut utf16 = [0u16; 2];
                let units: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                map.push_str(&format!("<{gid:04x}> <{units}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }
}
