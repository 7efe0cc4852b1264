//! Command-line interface

use std::path::PathBuf;

use clap::Parser;
use fontcat_render::{CatalogOptions, Detail, LayoutConfig};
use fontcat_text::{DiscoveryConfig, EnrichOptions, DEFAULT_ACCENTS, DEFAULT_SAMPLE_TEXT};

use crate::output::default_pdf_path;

/// Raster scale bounds (pixels per point)
pub const RASTER_SCALE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=4.0;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fontcat",
    version,
    about = "Generate a PDF catalogue of the installed fonts and search them fuzzily",
    long_about = None
)]
pub struct Cli {
    /// Write the PDF catalogue; without a value writes fonts_in_<hostname>.pdf
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub pdf: Option<Option<PathBuf>>,

    /// Detailed entries (adds a specs line per face)
    #[arg(long)]
    pub full: bool,

    /// Fuzzy search a font by name
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Number of search results
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// List faces without writing a PDF
    #[arg(long)]
    pub list_only: bool,

    /// Keep only faces with a drawable sample
    #[arg(long)]
    pub require_sample: bool,

    /// Keep only faces covering every accent character
    #[arg(long)]
    pub require_accents: bool,

    /// Accent characters checked for coverage
    #[arg(long, default_value = DEFAULT_ACCENTS)]
    pub accents: String,

    /// Sample text drawn with each face
    #[arg(long, default_value = DEFAULT_SAMPLE_TEXT)]
    pub sample: String,

    /// Section header size in points
    #[arg(long, default_value_t = 26.0, value_parser = parse_section_size)]
    pub section_size: f32,

    /// Raster sample scale, 1.0 to 4.0; higher is sharper
    #[arg(long, visible_alias = "pil-scale", default_value_t = 2.0, value_parser = parse_raster_scale)]
    pub raster_scale: f32,

    /// Mark faces without embeddable outlines undrawable instead of rasterizing them
    #[arg(long)]
    pub no_raster: bool,

    /// Skip fc-list and scan font directories
    #[arg(long)]
    pub scan: bool,

    /// Extra font directory to scan (repeatable)
    #[arg(long = "font-dir", value_name = "DIR")]
    pub font_dirs: Vec<PathBuf>,
}

fn parse_raster_scale(s: &str) -> Result<f32, String> {
    let scale: f32 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if RASTER_SCALE_RANGE.contains(&scale) {
        Ok(scale)
    } else {
        Err(format!(
            "must be between {} and {}",
            RASTER_SCALE_RANGE.start(),
            RASTER_SCALE_RANGE.end()
        ))
    }
}

fn parse_section_size(s: &str) -> Result<f32, String> {
    let size: f32 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err("must be a positive size".into())
    }
}

impl Cli {
    /// Whether any output was requested
    pub fn has_action(&self) -> bool {
        self.pdf.is_some() || self.list_only || self.search.is_some()
    }

    /// Output path of the PDF, if one was requested
    pub fn pdf_path(&self, hostname: &str) -> Option<PathBuf> {
        match &self.pdf {
            Some(Some(path)) => Some(path.clone()),
            Some(None) => Some(default_pdf_path(hostname)),
            None => None,
        }
    }

    pub fn detail(&self) -> Detail {
        if self.full { Detail::Full } else { Detail::Simple }
    }

    pub fn discovery_config(&self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig {
            extra_dirs: self.font_dirs.clone(),
            ..Default::default()
        };
        if self.scan {
            config.use_system_index = false;
        }
        config
    }

    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            sample_text: self.sample.clone(),
            accents: self.accents.clone(),
            require_sample: self.require_sample,
            require_accents: self.require_accents,
            raster_scale: self.raster_scale,
            raster_fallback: !self.no_raster,
            ..Default::default()
        }
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            layout: LayoutConfig::default().with_header_size(self.section_size),
            detail: self.detail(),
            sample_text: self.sample.clone(),
            raster_scale: self.raster_scale,
            temp_dir: None,
        }
    }
}
