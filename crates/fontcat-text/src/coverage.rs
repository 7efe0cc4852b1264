//! Accent coverage against the best cmap subtable

use crate::font::{FontDatabase, FontFace, ParsedFace};

/// Distinct non-whitespace characters of a requirement string
pub fn required_chars(accents: &str) -> Vec<char> {
    let mut chars: Vec<char> = accents.chars().filter(|c| !c.is_whitespace()).collect();
    chars.sort_unstable();
    chars.dedup();
    chars
}

/// Whether `face` maps every char in `chars`.
///
/// An empty requirement is always met. Any failure to load or parse the
/// face counts as missing coverage.
pub fn supports_chars(db: &mut FontDatabase, face: &FontFace, chars: &[char]) -> bool {
    if chars.is_empty() {
        return true;
    }
    db.with_face_data(&face.path, face.face_index(), |data, index| {
        ParsedFace::parse(data, index)
            .map(|parsed| parsed.covers_all(chars))
            .unwrap_or(false)
    })
    .unwrap_or(false)
}

/// Set `supports_accents` on every face
pub fn mark_accent_support(db: &mut FontDatabase, faces: &mut [FontFace], accents: &str) {
    let chars = required_chars(accents);
    for face in faces.iter_mut() {
        face.supports_accents = Some(supports_chars(db, face, &chars));
    }
    tracing::debug!(
        "Accent coverage: {}/{} face(s) cover {:?}",
        faces.iter().filter(|f| f.supports_accents == Some(true)).count(),
        faces.len(),
        accents
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_chars() {
        assert_eq!(required_chars("á é\tá\n"), vec!['á', 'é']);
        assert!(required_chars("   ").is_empty());
    }

    #[test]
    fn test_empty_requirement_is_vacuous() {
        let mut db = FontDatabase::new();
        let mut faces = vec![
            FontFace::new("Ghost", "Regular", "", "/missing/ghost.ttf"),
            FontFace::new("Ghost", "Bold", "", "/missing/ghost.ttc").with_index(Some(3)),
        ];
        mark_accent_support(&mut db, &mut faces, "");
        assert!(faces.iter().all(|f| f.supports_accents == Some(true)));
    }

    #[test]
    fn test_unreadable_face_has_no_coverage() {
        let mut db = FontDatabase::new();
        let mut faces = vec![FontFace::new("Ghost", "Regular", "", "/missing/ghost.ttf")];
        mark_accent_support(&mut db, &mut faces, "ÁÉÍ");
        assert_eq!(faces[0].supports_accents, Some(false));
    }
}
