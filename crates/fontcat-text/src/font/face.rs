//! Parsed font face with names, metadata and coverage lookups

use ttf_parser::{cmap, name_id, Face, GlyphId, Permissions, PlatformId, RawFace, Tag};

use super::tables::Os2Fields;
use super::Classification;
use crate::{Result, TextError};

/// cmap subtables in best-mapping preference order
const BEST_CMAP_ORDER: &[(PlatformId, u16)] = &[
    (PlatformId::Windows, 10),
    (PlatformId::Unicode, 6),
    (PlatformId::Unicode, 4),
    (PlatformId::Windows, 1),
    (PlatformId::Unicode, 3),
    (PlatformId::Unicode, 2),
    (PlatformId::Unicode, 1),
    (PlatformId::Unicode, 0),
];

const WINDOWS_ENGLISH_US: u16 = 0x0409;

/// Family / style / full name triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceNames {
    pub family: String,
    pub style: String,
    pub full_name: String,
}

impl FaceNames {
    /// Apply the `Unknown` / `Regular` / `"family style"` fallbacks
    pub fn with_fallbacks(family: &str, style: &str, full_name: &str) -> Self {
        let family = match family.trim() {
            "" => "Unknown".to_string(),
            f => f.to_string(),
        };
        let style = match style.trim() {
            "" => "Regular".to_string(),
            s => s.to_string(),
        };
        let full_name = match full_name.trim() {
            "" => format!("{family} {style}").trim().to_string(),
            n => n.to_string(),
        };
        Self {
            family,
            style,
            full_name,
        }
    }
}

/// Metadata extracted from OS/2, post and the family name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceMetadata {
    pub weight: Option<u16>,
    pub italic: Option<bool>,
    pub monospace: bool,
    pub classification: Classification,
}

/// Name-substring classification used when PANOSE says nothing
pub fn classify_by_name(family: &str) -> Classification {
    let lower = family.to_lowercase();
    if lower.contains("sans") {
        Classification::Sans
    } else if lower.contains("serif") {
        Classification::Serif
    } else {
        Classification::Unknown
    }
}

/// Parsed font face with metadata accessors
pub struct ParsedFace<'a> {
    /// The underlying ttf-parser face
    face: Face<'a>,
    /// Raw table directory, for PANOSE and truncated OS/2 tables
    raw: RawFace<'a>,
}

impl<'a> ParsedFace<'a> {
    /// Parse a font face from data
    pub fn parse(data: &'a [u8], index: u32) -> Result<Self> {
        let face = Face::parse(data, index).map_err(|e| TextError::FontParsing(e.to_string()))?;
        let raw =
            RawFace::parse(data, index).map_err(|e| TextError::FontParsing(e.to_string()))?;
        Ok(Self { face, raw })
    }

    /// Raw bytes of a table
    pub fn raw_table(&self, tag: &[u8; 4]) -> Option<&'a [u8]> {
        self.raw.table(Tag::from_bytes(tag))
    }

    /// Look up a name record, Windows English first, then Macintosh Roman
    pub fn name(&self, id: u16) -> Option<String> {
        let windows = self.face.names().into_iter().find(|n| {
            n.name_id == id
                && n.platform_id == PlatformId::Windows
                && n.encoding_id == 1
                && n.language_id == WINDOWS_ENGLISH_US
        });
        if let Some(value) = windows.and_then(|n| n.to_string()) {
            return Some(value);
        }
        self.face
            .names()
            .into_iter()
            .find(|n| {
                n.name_id == id
                    && n.platform_id == PlatformId::Macintosh
                    && n.encoding_id == 0
                    && n.language_id == 0
            })
            .map(|n| decode_mac_roman(n.name))
    }

    /// Family / style / full name with fallbacks
    pub fn names(&self) -> FaceNames {
        FaceNames::with_fallbacks(
            &self.name(name_id::FAMILY).unwrap_or_default(),
            &self.name(name_id::SUBFAMILY).unwrap_or_default(),
            &self.name(name_id::FULL_NAME).unwrap_or_default(),
        )
    }

    /// PostScript name, if present
    pub fn post_script_name(&self) -> Option<String> {
        self.name(name_id::POST_SCRIPT_NAME)
    }

    pub fn os2(&self) -> Option<Os2Fields> {
        self.raw_table(b"OS/2").and_then(|data| Os2Fields::parse(data).ok())
    }

    /// `post.isFixedPitch`, `None` without a post table
    pub fn fixed_pitch(&self) -> Option<bool> {
        self.face.tables().post.map(|post| post.is_monospaced)
    }

    /// fsSelection italic bit (false when OS/2 is missing)
    pub fn is_italic(&self) -> bool {
        self.face.is_italic()
    }

    /// Weight, italic, monospace and classification.
    ///
    /// `family_hint` feeds the name heuristics used when `post` or PANOSE
    /// data is missing.
    pub fn metadata(&self, family_hint: &str) -> FaceMetadata {
        let os2 = self.os2();
        let monospace = self
            .fixed_pitch()
            .unwrap_or_else(|| family_hint.to_lowercase().contains("mono"));
        let classification = if monospace {
            Classification::Mono
        } else {
            os2.and_then(|o| o.panose)
                .and_then(|p| p.classification())
                .unwrap_or_else(|| classify_by_name(family_hint))
        };
        FaceMetadata {
            weight: os2.map(|o| o.weight_class),
            italic: os2.map(|_| self.is_italic()),
            monospace,
            classification,
        }
    }

    fn best_subtable(&self) -> Option<cmap::Subtable<'a>> {
        let table = self.face.tables().cmap?;
        BEST_CMAP_ORDER.iter().find_map(|&(platform, encoding)| {
            table
                .subtables
                .into_iter()
                .find(|s| s.platform_id == platform && s.encoding_id == encoding)
        })
    }

    /// Whether every char maps to a real glyph in the best cmap subtable
    pub fn covers_all(&self, chars: &[char]) -> bool {
        if chars.is_empty() {
            return true;
        }
        let Some(subtable) = self.best_subtable() else {
            return false;
        };
        chars.iter().all(|&c| {
            subtable
                .glyph_index(c as u32)
                .is_some_and(|g| g.0 != 0)
        })
    }

    /// Whether the face has TrueType (`glyf`) outlines
    pub fn has_truetype_outlines(&self) -> bool {
        self.face.tables().glyf.is_some()
    }

    /// Whether the OS/2 licence bits forbid outline embedding
    /// (restricted licence, or bitmap embedding only)
    pub fn forbids_embedding(&self) -> bool {
        self.face.tables().os2.is_some_and(|os2| {
            os2.permissions() == Some(Permissions::Restricted) || !os2.is_outline_embedding_allowed()
        })
    }

    /// Italic angle from the post table (0 when missing)
    pub fn italic_angle(&self) -> f32 {
        self.face.italic_angle().unwrap_or(0.0)
    }

    /// Units per em
    pub fn units_per_em(&self) -> u16 {
        self.face.units_per_em()
    }

    /// Ascender (above baseline)
    pub fn ascender(&self) -> i16 {
        self.face.ascender()
    }

    /// Descender (below baseline, usually negative)
    pub fn descender(&self) -> i16 {
        self.face.descender()
    }

    pub fn capital_height(&self) -> i16 {
        self.face.capital_height().unwrap_or_else(|| self.face.ascender())
    }

    /// Get glyph horizontal advance
    pub fn glyph_hor_advance(&self, glyph_id: u16) -> Option<u16> {
        self.face.glyph_hor_advance(GlyphId(glyph_id))
    }

    /// Get underlying ttf-parser face
    pub fn ttf_face(&self) -> &Face<'a> {
        &self.face
    }
}

/// Decode a Macintosh Roman name record; bytes outside ASCII become `?`
fn decode_mac_roman(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_name() {
        assert_eq!(classify_by_name("DejaVu Sans"), Classification::Sans);
        assert_eq!(classify_by_name("Noto Serif"), Classification::Serif);
        // "sans" wins over "serif" in "Sans Serif"
        assert_eq!(classify_by_name("Microsoft Sans Serif"), Classification::Sans);
        assert_eq!(classify_by_name("Garamond"), Classification::Unknown);
    }

    #[test]
    fn test_garbage_does_not_parse() {
        assert!(ParsedFace::parse(b"definitely not a font", 0).is_err());
        assert!(ParsedFace::parse(&[], 0).is_err());
    }

    #[test]
    fn test_mac_roman_decoding() {
        assert_eq!(decode_mac_roman(b"Times"), "Times");
        assert_eq!(decode_mac_roman(&[b'A', 0x8E]), "A?");
    }
}
