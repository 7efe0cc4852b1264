//! Draw-mode negotiation
//!
//! Each face is tried against the backends in order: embedded vector text,
//! then the raster fallback, and is marked undrawable when neither works.

use crate::font::{FontDatabase, FontFace, ParsedFace};
use crate::render::{SampleBox, SampleRasterizer};
use crate::{Result, TextError};

/// How a face's sample can be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    /// Embeddable TrueType outlines, drawn as text
    Vector,
    /// Drawn as an image of the measured size (points)
    Raster(SampleBox),
    Undrawable,
}

impl DrawMode {
    pub fn is_drawable(&self) -> bool {
        !matches!(self, DrawMode::Undrawable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawMode::Vector => "vector",
            DrawMode::Raster(_) => "raster",
            DrawMode::Undrawable => "undrawable",
        }
    }
}

/// Check that the face data can be embedded as a TrueType font
pub fn check_embeddable(data: &[u8], index: u32) -> Result<()> {
    let parsed = ParsedFace::parse(data, index)?;
    if !parsed.has_truetype_outlines() {
        return Err(TextError::NotEmbeddable("no TrueType outlines".into()));
    }
    if parsed.forbids_embedding() {
        return Err(TextError::NotEmbeddable("restricted licence".into()));
    }
    Ok(())
}

/// Whether the vector backend accepts this face.
///
/// Faces inside container files always go to the raster backend.
pub fn vector_support(db: &mut FontDatabase, face: &FontFace) -> Result<()> {
    if face.is_container() {
        return Err(TextError::NotEmbeddable(format!(
            "{} is a collection",
            face.display_path(" ")
        )));
    }
    db.with_face_data(&face.path, face.face_index(), check_embeddable)
        .ok_or_else(|| TextError::FontNotFound(face.display_path(" ")))?
}

/// Pick the draw mode for a face.
///
/// `rasterizer` is `None` when the raster fallback is disabled.
pub fn negotiate_draw_mode(
    db: &mut FontDatabase,
    face: &FontFace,
    sample_text: &str,
    rasterizer: Option<&SampleRasterizer>,
) -> DrawMode {
    match vector_support(db, face) {
        Ok(()) => return DrawMode::Vector,
        Err(err) => tracing::trace!("Vector backend rejected {}: {}", face.full_name, err),
    }

    let Some(rasterizer) = rasterizer else {
        return DrawMode::Undrawable;
    };
    match rasterizer.measure(db, face, sample_text) {
        Ok(size) => DrawMode::Raster(size),
        Err(err) => {
            tracing::debug!("No sample for {}: {}", face.display_path(" "), err);
            DrawMode::Undrawable
        }
    }
}
