//! Sample rasterization for faces that cannot be embedded

use std::path::Path;

use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::font::{FontDatabase, FontFace};
use crate::shaping::{ShapedRun, TextShaper};
use crate::{Result, TextError};

/// Padding added to each axis of the ink box, in pixels
const INK_PADDING_PX: i32 = 2;

/// Measured sample size in page units (points)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleBox {
    pub width: f32,
    pub height: f32,
}

/// A rasterized sample line: dark ink on a white, opaque background
pub struct RasterizedSample {
    pub pixmap: tiny_skia::Pixmap,
    /// Rasterization scale (pixels per point)
    pub scale: f32,
}

impl RasterizedSample {
    pub fn width_px(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height_px(&self) -> u32 {
        self.pixmap.height()
    }

    /// Size scaled back down to points
    pub fn size(&self) -> SampleBox {
        SampleBox {
            width: self.width_px() as f32 / self.scale,
            height: self.height_px() as f32 / self.scale,
        }
    }

    /// Grayscale bytes, one per pixel, row-major
    pub fn gray(&self) -> Vec<u8> {
        self.pixmap.pixels().iter().map(|p| p.red()).collect()
    }

    /// Write the sample as PNG
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|e| TextError::RasterizationFailed(e.to_string()))
    }
}

/// Ink bounding box in pixels, y pointing down from the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InkBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl InkBox {
    fn width(&self) -> u32 {
        (self.right - self.left + INK_PADDING_PX).max(1) as u32
    }

    fn height(&self) -> u32 {
        (self.bottom - self.top + INK_PADDING_PX).max(1) as u32
    }
}

/// Raster fallback: shapes with rustybuzz, fills outlines with tiny-skia
pub struct SampleRasterizer {
    /// Target text size in points
    pub font_size: f32,
    /// Pixels per point
    pub scale: f32,
    shaper: TextShaper,
}

impl SampleRasterizer {
    /// Create a new rasterizer
    pub fn new(font_size: f32, scale: f32) -> Self {
        Self {
            font_size,
            scale,
            shaper: TextShaper::new(),
        }
    }

    /// Em size in whole pixels
    pub fn pixel_size(&self) -> f32 {
        (self.font_size * self.scale).round().max(1.0)
    }

    fn shape<'d>(&self, data: &'d [u8], index: u32, text: &str) -> Result<(Face<'d>, ShapedRun)> {
        let run = self.shaper.shape_with_data(data, index, text, self.pixel_size())?;
        let face = Face::parse(data, index).map_err(|e| TextError::FontParsing(e.to_string()))?;
        Ok((face, run))
    }

    fn ink_box(face: &Face, run: &ShapedRun) -> InkBox {
        let scale = run.scale();
        let mut ink: Option<(f32, f32, f32, f32)> = None;

        for pos in run.positioned_glyphs() {
            let Some(bbox) = face.glyph_bounding_box(GlyphId(pos.glyph_id)) else {
                continue;
            };
            let left = pos.x + bbox.x_min as f32 * scale;
            let right = pos.x + bbox.x_max as f32 * scale;
            let top = -(pos.y + bbox.y_max as f32 * scale);
            let bottom = -(pos.y + bbox.y_min as f32 * scale);
            ink = Some(match ink {
                Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
                None => (left, top, right, bottom),
            });
        }

        match ink {
            Some((l, t, r, b)) => InkBox {
                left: l.floor() as i32,
                top: t.floor() as i32,
                right: r.ceil() as i32,
                bottom: b.ceil() as i32,
            },
            None => InkBox { left: 0, top: 0, right: 0, bottom: 0 },
        }
    }

    /// Measure the sample box (points) from raw font data
    pub fn measure_with_data(&self, data: &[u8], index: u32, text: &str) -> Result<SampleBox> {
        let (face, run) = self.shape(data, index, text)?;
        let ink = Self::ink_box(&face, &run);
        Ok(SampleBox {
            width: ink.width() as f32 / self.scale,
            height: ink.height() as f32 / self.scale,
        })
    }

    /// Rasterize the sample from raw font data
    pub fn rasterize_with_data(&self, data: &[u8], index: u32, text: &str) -> Result<RasterizedSample> {
        let (face, run) = self.shape(data, index, text)?;
        let ink = Self::ink_box(&face, &run);

        let mut pixmap = tiny_skia::Pixmap::new(ink.width(), ink.height()).ok_or_else(|| {
            TextError::RasterizationFailed(format!("bad sample size {}x{}", ink.width(), ink.height()))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let origin_x = (1 - ink.left) as f32;
        let origin_y = (1 - ink.top) as f32;
        let mut builder = PathBuilder::new(run.scale());
        for pos in run.positioned_glyphs() {
            builder.set_origin(origin_x + pos.x, origin_y - pos.y);
            face.outline_glyph(GlyphId(pos.glyph_id), &mut builder);
        }

        if let Some(path) = builder.finish() {
            let mut paint = tiny_skia::Paint::default();
            paint.set_color(tiny_skia::Color::BLACK);
            paint.anti_alias = true;
            pixmap.fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::Winding,
                tiny_skia::Transform::identity(),
                None,
            );
        }

        Ok(RasterizedSample { pixmap, scale: self.scale })
    }

    /// Measure the sample box for a database face
    pub fn measure(&self, db: &mut FontDatabase, face: &FontFace, text: &str) -> Result<SampleBox> {
        db.with_face_data(&face.path, face.face_index(), |data, index| {
            self.measure_with_data(data, index, text)
        })
        .ok_or_else(|| TextError::FontNotFound(face.display_path(" ")))?
    }

    /// Rasterize the sample for a database face
    pub fn rasterize(&self, db: &mut FontDatabase, face: &FontFace, text: &str) -> Result<RasterizedSample> {
        db.with_face_data(&face.path, face.face_index(), |data, index| {
            self.rasterize_with_data(data, index, text)
        })
        .ok_or_else(|| TextError::FontNotFound(face.display_path(" ")))?
    }
}

/// Path builder that converts ttf-parser outlines to tiny-skia paths
struct PathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    origin_x: f32,
    origin_y: f32,
}

impl PathBuilder {
    fn new(scale: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    /// Move the pen origin (pixels, y down) for the next glyph
    fn set_origin(&mut self, x: f32, y: f32) {
        self.origin_x = x;
        self.origin_y = y;
    }

    fn transform_x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.origin_y - y * self.scale // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
