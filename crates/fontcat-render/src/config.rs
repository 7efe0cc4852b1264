//! Page geometry and typographic constants
//!
//! All sizes are in PDF points (1/72 inch).

/// Points per millimetre
pub const MM: f32 = 72.0 / 25.4;

/// Amount of detail per catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    /// Sample and path
    #[default]
    Simple,
    /// Sample, specs line and path
    Full,
}

impl Detail {
    pub fn as_str(&self) -> &'static str {
        match self {
            Detail::Simple => "simple",
            Detail::Full => "full",
        }
    }
}

/// Immutable layout configuration, passed explicitly to pagination
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,

    pub title_size: f32,
    /// Title line height as a multiple of `title_size`
    pub title_leading: f32,
    pub summary_size: f32,
    pub summary_line: f32,

    pub header_size: f32,
    /// Header ascent as a fraction of `header_size`
    pub header_ascent: f32,
    /// Header descent as a fraction of `header_size`
    pub header_descent: f32,
    pub after_header_gap: f32,

    pub sample_size: f32,
    /// Line height of a vector sample; also the minimum sample slot
    pub sample_line: f32,
    /// Extra space below a raster sample
    pub raster_gap: f32,
    pub placeholder_size: f32,
    pub placeholder_line: f32,

    pub specs_size: f32,
    pub specs_line: f32,

    pub path_size: f32,
    pub path_gap: f32,
    pub path_line: f32,

    pub entry_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            // A4
            page_width: 595.28,
            page_height: 841.89,
            margin: 15.0 * MM,

            title_size: 16.0,
            title_leading: 1.1,
            summary_size: 9.0,
            summary_line: 14.0,

            header_size: 26.0,
            header_ascent: 0.8,
            header_descent: 0.2,
            after_header_gap: 6.0,

            sample_size: 12.0,
            sample_line: 14.0,
            raster_gap: 2.0,
            placeholder_size: 9.0,
            placeholder_line: 12.0,

            specs_size: 8.0,
            specs_line: 12.0,

            path_size: 8.0,
            path_gap: 4.0,
            path_line: 10.0,

            entry_gap: 8.0,
        }
    }
}

impl LayoutConfig {
    /// Configuration with a custom section header size
    pub fn with_header_size(mut self, size: f32) -> Self {
        self.header_size = size;
        self
    }

    /// Top of the writable area
    pub fn top(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Vertical space taken by a section header, gap included
    pub fn header_band(&self) -> f32 {
        self.header_size * (self.header_ascent + self.header_descent) + self.after_header_gap
    }

    /// Height reserved for one entry with the given sample height
    pub fn block_height(&self, sample_height: f32, detail: Detail) -> f32 {
        let specs = match detail {
            Detail::Simple => 0.0,
            Detail::Full => self.specs_line,
        };
        sample_height.max(self.sample_line) + self.path_gap + self.path_line + self.entry_gap + specs
    }
}
