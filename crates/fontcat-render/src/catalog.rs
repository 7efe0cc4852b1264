//! Catalogue generation: plan, draw, save

use std::path::{Path, PathBuf};

use fontcat_text::{DrawMode, FontDatabase, PreparedFace, RasterizedSample, SampleRasterizer, DEFAULT_SAMPLE_TEXT};

use crate::config::{Detail, LayoutConfig};
use crate::layout::{plan_catalog, Element, PLACEHOLDER};
use crate::pdf::{CatalogWriter, PageBuilder, StandardFont};
use crate::temp::TempImages;
use crate::{RenderError, Result};

/// Options for one catalogue document
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub layout: LayoutConfig,
    pub detail: Detail,
    pub sample_text: String,
    /// Pixels per point for raster samples
    pub raster_scale: f32,
    /// Directory for temp raster images (system temp dir when `None`)
    pub temp_dir: Option<PathBuf>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            detail: Detail::Simple,
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
            raster_scale: 2.0,
            temp_dir: None,
        }
    }
}

/// What was written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub faces: usize,
    pub pages: usize,
    pub sections: usize,
    pub bookmarks: usize,
    pub vector_samples: usize,
    pub raster_samples: usize,
    pub placeholders: usize,
    pub embedded_fonts: usize,
    /// Temp images created; each is removed right after it is read back
    pub temp_images: usize,
}

struct SampleDrawer<'r> {
    rasterizer: SampleRasterizer,
    images: &'r mut TempImages,
    summary: &'r mut CatalogSummary,
}

impl SampleDrawer<'_> {
    /// Draw one sample; falls back to the placeholder when the backend
    /// that accepted the face during enrichment fails now
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &mut self,
        writer: &mut CatalogWriter,
        page: &mut PageBuilder,
        db: &mut FontDatabase,
        opts: &CatalogOptions,
        face: &PreparedFace,
        x: f32,
        y: f32,
    ) -> Result<()> {
        let layout = &opts.layout;
        let drawn = match face.draw_mode {
            DrawMode::Vector => writer
                .draw_glyphs(page, db, &face.face, layout.sample_size, x, y, &opts.sample_text)
                .map(|()| self.summary.vector_samples += 1),
            DrawMode::Raster(_) => self
                .draw_raster(writer, page, db, face, &opts.sample_text, x, y, layout.raster_gap)
                .map(|()| self.summary.raster_samples += 1),
            DrawMode::Undrawable => Err(RenderError::Pdf("face is undrawable".into())),
        };

        match drawn {
            Ok(()) => Ok(()),
            // Temp files that cannot be created are fatal
            Err(RenderError::Io(err)) => Err(RenderError::Io(err)),
            Err(err) => {
                tracing::warn!("Sample for {} failed: {}", face.face.display_path(" "), err);
                writer.draw_text(page, StandardFont::Helvetica, layout.placeholder_size, x, y, PLACEHOLDER);
                self.summary.placeholders += 1;
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_raster(
        &mut self,
        writer: &mut CatalogWriter,
        page: &mut PageBuilder,
        db: &mut FontDatabase,
        face: &PreparedFace,
        text: &str,
        x: f32,
        y: f32,
        gap: f32,
    ) -> Result<()> {
        let sample = self.rasterizer.rasterize(db, &face.face, text)?;
        let pixmap = self.images.round_trip(&sample)?;
        let image = RasterizedSample { pixmap, scale: sample.scale };
        let size = image.size();
        writer.draw_image(
            page,
            image.gray(),
            image.width_px(),
            image.height_px(),
            x,
            y - size.height + gap,
            size.width,
            size.height,
        )
    }
}

/// Render prepared faces into a PDF at `out`.
///
/// Each raster sample's temp image is removed as soon as it has been read
/// back, before the next element is drawn.
pub fn render_catalog(
    db: &mut FontDatabase,
    prepared: &[PreparedFace],
    opts: &CatalogOptions,
    out: &Path,
) -> Result<CatalogSummary> {
    let layout = &opts.layout;
    let plan = plan_catalog(prepared, layout, opts.detail);

    let mut summary = CatalogSummary {
        faces: prepared.len(),
        sections: plan.sections.len(),
        bookmarks: plan.bookmarks.len(),
        ..Default::default()
    };
    let mut images = match &opts.temp_dir {
        Some(dir) => TempImages::in_dir(dir),
        None => TempImages::new(),
    };
    let mut writer = CatalogWriter::new(layout.page_width, layout.page_height);

    {
        let mut drawer = SampleDrawer {
            rasterizer: SampleRasterizer::new(layout.sample_size, opts.raster_scale),
            images: &mut images,
            summary: &mut summary,
        };

        for planned in &plan.pages {
            let mut page = PageBuilder::default();
            for element in &planned.elements {
                match element {
                    Element::Text { text, font, size, x, y } => {
                        if text == PLACEHOLDER {
                            drawer.summary.placeholders += 1;
                        }
                        writer.draw_text(&mut page, *font, *size, *x, *y, text);
                    }
                    Element::Sample { face, x, y } => {
                        drawer.draw(&mut writer, &mut page, db, opts, face, *x, *y)?;
                    }
                }
            }
            writer.end_page(page)?;
        }
    }

    summary.pages = writer.page_count();
    summary.embedded_fonts = writer.embedded_fonts();
    summary.temp_images = images.created();
    writer.save(&plan.bookmarks, layout.margin, out)?;

    tracing::info!(
        "Wrote {} ({} page(s), {} section(s), {} raster sample(s))",
        out.display(),
        summary.pages,
        summary.sections,
        summary.raster_samples
    );
    Ok(summary)
}
