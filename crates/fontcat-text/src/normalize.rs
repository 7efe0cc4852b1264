//! Name normalization, ordering and section letters

use std::path::PathBuf;

use unicode_normalization::UnicodeNormalization;

use crate::font::FontFace;

/// Section bucket for names that do not start with a letter
pub const FALLBACK_SECTION: &str = "#";

/// Lower-case and collapse hyphens, underscores and whitespace into single
/// spaces. Idempotent.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sort key shared by discovery, enrichment and listing
pub fn sort_key(face: &FontFace) -> (String, String, PathBuf) {
    (normalize(&face.family), normalize(&face.style), face.path.clone())
}

/// Sort faces by `(normalized family, normalized style, path)`, collection
/// index last so container faces keep their order.
pub fn sort_faces(faces: &mut [FontFace]) {
    faces.sort_by_cached_key(|f| (sort_key(f), f.index));
}

/// Section letter for a face name.
///
/// The leading character must be alphabetic; it is canonically decomposed
/// and an ASCII base letter is upper-cased (`é` → `E`), any other letter is
/// upper-cased as-is. Names that start with a digit, symbol or nothing land
/// in [`FALLBACK_SECTION`].
pub fn section_letter(name: &str) -> String {
    let Some(first) = name.trim().chars().next().filter(|c| c.is_alphabetic()) else {
        return FALLBACK_SECTION.to_string();
    };
    let base = first.nfd().next().unwrap_or(first);
    if base.is_ascii_alphabetic() {
        base.to_ascii_uppercase().to_string()
    } else {
        first.to_uppercase().collect()
    }
}

/// Section letter of a face: family name, or file name when the family is
/// empty
pub fn face_section(face: &FontFace) -> String {
    if face.family.trim().is_empty() {
        section_letter(&face.file_name())
    } else {
        section_letter(&face.family)
    }
}
