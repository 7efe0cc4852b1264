//! fontcat Text - Font Discovery and Sample Preparation
//!
//! This crate provides everything the catalogue needs before layout:
//! - Font discovery (fc-list or directory scan) and metadata (fontdb, ttf-parser)
//! - Accent coverage checks against the best cmap subtable
//! - Draw-mode negotiation (embedded vector, raster fallback, undrawable)
//! - Sample shaping (rustybuzz) and rasterization (tiny-skia)
//! - Section letters, sort keys and fuzzy search

pub mod font;
pub mod discovery;
pub mod coverage;
pub mod shaping;
pub mod render;
pub mod draw_mode;
pub mod enrich;
pub mod normalize;
pub mod search;

pub use font::{Classification, FaceKey, FontDatabase, FontFace, ParsedFace};
pub use discovery::{discover, Discovery, DiscoveryConfig, DiscoveryError, DiscoverySource};
pub use coverage::{mark_accent_support, supports_chars};
pub use shaping::{ShapedGlyph, ShapedRun, TextShaper};
pub use render::{SampleBox, SampleRasterizer, RasterizedSample};
pub use draw_mode::{negotiate_draw_mode, DrawMode};
pub use enrich::{enrich_and_prepare, EnrichOptions, PreparedFace, DEFAULT_ACCENTS, DEFAULT_SAMPLE_TEXT};
pub use normalize::{face_section, normalize, section_letter, sort_faces, sort_key, FALLBACK_SECTION};
pub use search::{search_fonts, SearchHit, SequenceMatcher};

/// Text rendering error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Font cannot be embedded: {0}")]
    NotEmbeddable(String),

    #[error("Shaping failed: {0}")]
    ShapingFailed(String),

    #[error("Rasterization failed: {0}")]
    RasterizationFailed(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
