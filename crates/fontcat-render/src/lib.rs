//! fontcat Render - Catalogue Pagination and PDF Output
//!
//! This crate provides:
//! - Immutable layout configuration (page geometry, sizes, gaps)
//! - Section grouping and a font-free pagination plan with bookmarks
//! - PDF writing with lopdf: standard fonts, embedded TrueType samples,
//!   raster sample images and a section outline
//! - Scoped temp files for raster samples

pub mod config;
pub mod layout;
pub mod pdf;
pub mod temp;
mod catalog;

pub use config::{Detail, LayoutConfig};
pub use layout::{group_sections, plan_catalog, Bookmark, CatalogPlan, Element, PlannedPage, Section};
pub use pdf::{CatalogWriter, FontRegistry, StandardFont};
pub use temp::TempImages;
pub use catalog::{render_catalog, CatalogOptions, CatalogSummary};

/// Catalogue rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error(transparent)]
    Text(#[from] fontcat_text::TextError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
