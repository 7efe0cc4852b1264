//! Enrichment: coverage, draw modes, strict filters and sections

use crate::coverage::mark_accent_support;
use crate::font::{FontDatabase, FontFace};
use crate::normalize::{face_section, sort_faces};
use crate::draw_mode::{negotiate_draw_mode, DrawMode};
use crate::render::SampleRasterizer;

/// Default accent requirement
pub const DEFAULT_ACCENTS: &str = "ÁÉÍÓÚ áéíóú ãõ ç ß";

/// Default sample line
pub const DEFAULT_SAMPLE_TEXT: &str =
    "Sphinx of black quartz, judge my vow — ÁÉÍÓÚ áéíóú ãõ ç ß 0123456789";

/// Enrichment options
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub sample_text: String,
    /// Characters every face is checked for (whitespace ignored)
    pub accents: String,
    /// Drop undrawable faces
    pub require_sample: bool,
    /// Drop faces without full accent coverage
    pub require_accents: bool,
    /// Pixels per point for the raster fallback
    pub raster_scale: f32,
    pub raster_fallback: bool,
    /// Sample text size (points)
    pub sample_font_size: f32,
    /// Line height reserved for a vector sample (points)
    pub sample_line_height: f32,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
            accents: DEFAULT_ACCENTS.to_string(),
            require_sample: false,
            require_accents: false,
            raster_scale: 2.0,
            raster_fallback: true,
            sample_font_size: 12.0,
            sample_line_height: 14.0,
        }
    }
}

impl EnrichOptions {
    /// Rasterizer for the fallback path, if enabled
    pub fn rasterizer(&self) -> Option<SampleRasterizer> {
        self.raster_fallback
            .then(|| SampleRasterizer::new(self.sample_font_size, self.raster_scale))
    }
}

/// A face ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFace {
    pub face: FontFace,
    /// Section letter (or the fallback bucket)
    pub section: String,
    pub draw_mode: DrawMode,
    /// Sample width in points (0 when not measured)
    pub sample_width: f32,
    /// Sample height in points
    pub sample_height: f32,
}

impl PreparedFace {
    /// Build a prepared face, freezing the sample size for `draw_mode`
    pub fn new(face: FontFace, draw_mode: DrawMode, line_height: f32) -> Self {
        let (sample_width, sample_height) = match draw_mode {
            DrawMode::Vector => (0.0, line_height),
            DrawMode::Raster(size) => (size.width, size.height),
            DrawMode::Undrawable => (0.0, 0.0),
        };
        Self {
            section: face_section(&face),
            face,
            draw_mode,
            sample_width,
            sample_height,
        }
    }
}

/// Run enrichment over discovered faces.
///
/// Sets accent coverage on every face, sorts them, negotiates a draw mode
/// for each and applies the strict filters. Output keeps the sort order.
pub fn enrich_and_prepare(
    db: &mut FontDatabase,
    mut faces: Vec<FontFace>,
    opts: &EnrichOptions,
) -> Vec<PreparedFace> {
    mark_accent_support(db, &mut faces, &opts.accents);
    sort_faces(&mut faces);

    let rasterizer = opts.rasterizer();
    let total = faces.len();
    let mut prepared = Vec::with_capacity(total);

    for face in faces {
        let mode = negotiate_draw_mode(db, &face, &opts.sample_text, rasterizer.as_ref());
        if opts.require_sample && !mode.is_drawable() {
            continue;
        }
        if opts.require_accents && face.supports_accents != Some(true) {
            continue;
        }
        prepared.push(PreparedFace::new(face, mode, opts.sample_line_height));
    }

    tracing::info!(
        "Prepared {}/{} face(s) ({} vector, {} raster, {} undrawable)",
        prepared.len(),
        total,
        count_mode(&prepared, |m| matches!(m, DrawMode::Vector)),
        count_mode(&prepared, |m| matches!(m, DrawMode::Raster(_))),
        count_mode(&prepared, |m| matches!(m, DrawMode::Undrawable)),
    );
    prepared
}

fn count_mode(prepared: &[PreparedFace], pred: impl Fn(&DrawMode) -> bool) -> usize {
    prepared.iter().filter(|p| pred(&p.draw_mode)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SampleBox;

    fn ghosts() -> Vec<FontFace> {
        vec![
            FontFace::new("Zeta", "Regular", "", "/missing/zeta.ttf"),
            FontFace::new("alpha", "Bold", "", "/missing/alpha.ttf"),
            FontFace::new("éclair", "Regular", "", "/missing/eclair.ttc").with_index(Some(1)),
        ]
    }

    #[test]
    fn test_prepared_sizes() {
        let face = FontFace::new("A", "Regular", "", "/a.ttf");
        let vector = PreparedFace::new(face.clone(), DrawMode::Vector, 14.0);
        assert_eq!((vector.sample_width, vector.sample_height), (0.0, 14.0));

        let raster = PreparedFace::new(face.clone(), DrawMode::Raster(SampleBox { width: 120.5, height: 9.0 }), 14.0);
        assert_eq!((raster.sample_width, raster.sample_height), (120.5, 9.0));

        let none = PreparedFace::new(face, DrawMode::Undrawable, 14.0);
        assert_eq!((none.sample_width, none.sample_height), (0.0, 0.0));
        assert_eq!(none.section, "A");
    }

    #[test]
    fn test_unreadable_faces_kept_when_lenient() {
        let mut db = FontDatabase::new();
        let prepared = enrich_and_prepare(&mut db, ghosts(), &EnrichOptions::default());

        let families: Vec<_> = prepared.iter().map(|p| p.face.family.as_str()).collect();
        // Sorting is by code point, so `é` comes after `z`
        assert_eq!(families, ["alpha", "Zeta", "éclair"]);
        let sections: Vec<_> = prepared.iter().map(|p| p.section.as_str()).collect();
        assert_eq!(sections, ["A", "Z", "E"]);
        assert!(prepared.iter().all(|p| p.draw_mode == DrawMode::Undrawable));
        assert!(prepared.iter().all(|p| p.face.supports_accents == Some(false)));
    }

    #[test]
    fn test_strict_filters() {
        let mut db = FontDatabase::new();
        let strict = EnrichOptions { require_sample: true, ..Default::default() };
        assert!(enrich_and_prepare(&mut db, ghosts(), &strict).is_empty());

        let strict = EnrichOptions { require_accents: true, ..Default::default() };
        assert!(enrich_and_prepare(&mut db, ghosts(), &strict).is_empty());

        // Empty requirement is met by every face
        let vacuous = EnrichOptions {
            require_accents: true,
            accents: String::new(),
            ..Default::default()
        };
        assert_eq!(enrich_and_prepare(&mut db, ghosts(), &vacuous).len(), 3);
    }

    #[test]
    fn test_no_raster_fallback() {
        let opts = EnrichOptions { raster_fallback: false, ..Default::default() };
        assert!(opts.rasterizer().is_none());
        assert!(EnrichOptions::default().rasterizer().is_some());
    }
}
