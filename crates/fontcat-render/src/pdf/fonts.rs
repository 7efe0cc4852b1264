//! Standard and embedded fonts
//!
//! Embedded fonts are TrueType files written whole as `FontFile2`, exposed
//! as `Type0` fonts with `Identity-H` encoding so content streams address
//! glyph ids directly. Only the widths of glyphs actually drawn are listed.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use fontcat_text::draw_mode::check_embeddable;
use fontcat_text::{FaceKey, FontDatabase, FontFace, ParsedFace, TextError, TextShaper};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::{RenderError, Result};

/// Base-14 fonts used for titles, headers and paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl StandardFont {
    pub const ALL: [StandardFont; 3] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
    ];

    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Name in page resource dictionaries
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
            StandardFont::HelveticaOblique => "F3",
        }
    }

    pub fn dictionary(&self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }
    }
}

/// Font descriptor values in PDF glyph space (1/1000 em)
#[derive(Debug, Clone)]
struct Descriptor {
    ps_name: String,
    flags: i64,
    bbox: [i64; 4],
    italic_angle: f32,
    ascent: i64,
    descent: i64,
    cap_height: i64,
}

/// An embedded face, registered once per document
#[derive(Debug)]
pub struct RegisteredFont {
    /// Name in page resource dictionaries
    pub resource: String,
    /// Reserved id of the `Type0` font dictionary
    pub font_id: ObjectId,
    file_id: ObjectId,
    descriptor: Descriptor,
    units_per_em: u16,
    /// Advance (font units) of every glyph drawn so far
    widths: BTreeMap<u16, u16>,
    /// Text of the first glyph of each cluster, for `ToUnicode`
    unicode: BTreeMap<u16, String>,
}

impl RegisteredFont {
    fn to_glyph_space(&self, units: f32) -> f32 {
        units * 1000.0 / self.units_per_em.max(1) as f32
    }

    /// Shape `text` and return the operand array of a `TJ` operator.
    ///
    /// Glyph ids are written as 2-byte strings; differences between the
    /// shaped advance and the font's own advance become adjustments.
    pub fn shape_tj(&mut self, db: &mut FontDatabase, face: &FontFace, text: &str) -> Result<Vec<Object>> {
        let units_per_em = self.units_per_em;
        let shaped = db
            .with_face_data(&face.path, face.face_index(), |data, index| {
                let run = TextShaper::new().shape_with_data(data, index, text, units_per_em as f32)?;
                let parsed = ParsedFace::parse(data, index)?;
                let advances: Vec<u16> = run
                    .glyphs
                    .iter()
                    .map(|g| parsed.glyph_hor_advance(g.glyph_id).unwrap_or(0))
                    .collect();
                Ok::<_, TextError>((run, advances))
            })
            .ok_or_else(|| TextError::FontNotFound(face.display_path(" ")))??;
        let (run, advances) = shaped;

        let clusters: BTreeSet<usize> = run.glyphs.iter().map(|g| g.cluster as usize).collect();
        let mut mapped = BTreeSet::new();

        let mut items = Vec::new();
        let mut pending: Vec<u8> = Vec::new();
        let flush = |pending: &mut Vec<u8>, items: &mut Vec<Object>| {
            if !pending.is_empty() {
                items.push(Object::String(std::mem::take(pending), StringFormat::Hexadecimal));
            }
        };

        for (glyph, &advance) in run.glyphs.iter().zip(&advances) {
            self.widths.insert(glyph.glyph_id, advance);

            let cluster = glyph.cluster as usize;
            if mapped.insert(cluster) {
                let end = clusters.range(cluster + 1..).next().copied().unwrap_or(text.len());
                if let Some(chars) = text.get(cluster..end) {
                    self.unicode.entry(glyph.glyph_id).or_insert_with(|| chars.to_string());
                }
            }

            let before = -self.to_glyph_space(glyph.x_offset as f32).round();
            if before != 0.0 {
                flush(&mut pending, &mut items);
                items.push(before.into());
            }
            pending.extend_from_slice(&glyph.glyph_id.to_be_bytes());
            let drift = glyph.x_advance - glyph.x_offset - advance as i32;
            let after = -self.to_glyph_space(drift as f32).round();
            if after != 0.0 {
                flush(&mut pending, &mut items);
                items.push(after.into());
            }
        }
        flush(&mut pending, &mut items);
        Ok(items)
    }

    /// `W` array entries for the glyphs used
    fn width_array(&self) -> Vec<Object> {
        let mut array = Vec::with_capacity(self.widths.len() * 2);
        for (&glyph, &advance) in &self.widths {
            array.push(Object::Integer(glyph as i64));
            let width = self.to_glyph_space(advance as f32).round() as i64;
            array.push(Object::Array(vec![Object::Integer(width)]));
        }
        array
    }

    /// `ToUnicode` CMap for the glyphs used
    fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );
        let entries: Vec<_> = self.unicode.iter().collect();
        // At most 100 entries per block
        for chunk in entries.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (glyph, text) in chunk {
                let hex: String = text.encode_utf16().map(|u| format!("{u:04X}")).collect();
                cmap.push_str(&format!("<{glyph:04X}> <{hex}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap.into_bytes()
    }

    /// Write the font dictionaries into the document
    fn write(&self, doc: &mut Document) {
        let d = &self.descriptor;
        let base_font = Object::Name(d.ps_name.clone().into_bytes());

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.clone(),
            "Flags" => d.flags,
            "FontBBox" => d.bbox.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
            "ItalicAngle" => d.italic_angle,
            "Ascent" => d.ascent,
            "Descent" => d.descent,
            "CapHeight" => d.cap_height,
            "StemV" => 80i64,
            "FontFile2" => self.file_id,
        });

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => base_font.clone(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0i64,
            },
            "FontDescriptor" => descriptor_id,
            "W" => self.width_array(),
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(Dictionary::new(), self.to_unicode_cmap()));

        doc.objects.insert(
            self.font_id,
            Object::Dictionary(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => base_font,
                "Encoding" => "Identity-H",
                "DescendantFonts" => vec![Object::Reference(cid_font_id)],
                "ToUnicode" => to_unicode_id,
            }),
        );
    }
}

/// PostScript-safe font name
fn pdf_font_name(name: Option<String>, fallback: &str) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() { fallback.to_string() } else { cleaned }
}

fn describe(parsed: &ParsedFace, fallback_name: &str) -> Descriptor {
    let units_per_em = parsed.units_per_em().max(1) as f32;
    let scale = |v: i16| (v as f32 * 1000.0 / units_per_em).round() as i64;

    let italic_angle = parsed.italic_angle();
    let fixed_pitch = parsed.fixed_pitch().unwrap_or(false);
    let italic = italic_angle != 0.0 || parsed.is_italic();
    // Nonsymbolic, plus FixedPitch and Italic
    let mut flags = 32;
    if fixed_pitch {
        flags |= 1;
    }
    if italic {
        flags |= 64;
    }

    let bbox = parsed.ttf_face().global_bounding_box();
    Descriptor {
        ps_name: pdf_font_name(parsed.post_script_name(), fallback_name),
        flags,
        bbox: [scale(bbox.x_min), scale(bbox.y_min), scale(bbox.x_max), scale(bbox.y_max)],
        italic_angle,
        ascent: scale(parsed.ascender()),
        descent: scale(parsed.descender()),
        cap_height: scale(parsed.capital_height()),
    }
}

/// Embedded fonts of one document, keyed by face identity
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<FaceKey, RegisteredFont>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Embed `face` on first use and return its registration
    pub fn register(
        &mut self,
        doc: &mut Document,
        db: &mut FontDatabase,
        face: &FontFace,
    ) -> Result<&mut RegisteredFont> {
        let number = self.fonts.len() + 1;
        match self.fonts.entry(face.key()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let font = embed(doc, db, face, number)?;
                tracing::debug!("Embedded {} as {}", face.display_path(" "), font.resource);
                Ok(entry.insert(font))
            }
        }
    }

    /// Write every registered font into the document
    pub fn finish(self, doc: &mut Document) {
        for font in self.fonts.values() {
            font.write(doc);
        }
    }
}

fn embed(doc: &mut Document, db: &mut FontDatabase, face: &FontFace, number: usize) -> Result<RegisteredFont> {
    if face.is_container() {
        return Err(RenderError::Text(TextError::NotEmbeddable(face.display_path(" "))));
    }
    let fallback_name = format!("FontcatEmbedded{number}");
    let (data, descriptor, units_per_em) = db
        .with_face_data(&face.path, face.face_index(), |data, index| {
            check_embeddable(data, index)?;
            let parsed = ParsedFace::parse(data, index)?;
            Ok::<_, TextError>((data.to_vec(), describe(&parsed, &fallback_name), parsed.units_per_em()))
        })
        .ok_or_else(|| TextError::FontNotFound(face.display_path(" ")))??;

    let length = data.len() as i64;
    let file_id = doc.add_object(Stream::new(dictionary! { "Length1" => length }, data));

    Ok(RegisteredFont {
        resource: format!("E{number}"),
        font_id: doc.new_object_id(),
        file_id,
        descriptor,
        units_per_em,
        widths: BTreeMap::new(),
        unicode: BTreeMap::new(),
    })
}
