//! Font faces, loading and metadata module

mod database;
mod face;
mod reader;
mod tables;

pub use database::FontDatabase;
pub use face::{FaceMetadata, FaceNames, ParsedFace};
pub use reader::{FontReader, ReadError};
pub use tables::{Os2Fields, Panose};

use std::fmt;
use std::path::{Path, PathBuf};

/// File extensions considered during a directory scan
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Extensions of container files holding several faces
pub const CONTAINER_EXTENSIONS: &[&str] = &["ttc", "otc"];

/// Lower-cased extension of a path, if any
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether the path has one of the scanned font extensions
pub fn is_font_path(path: &Path) -> bool {
    extension(path).is_some_and(|e| FONT_EXTENSIONS.contains(&e.as_str()))
}

/// Whether the path names a multi-face container file (`.ttc` / `.otc`)
pub fn is_container_path(path: &Path) -> bool {
    extension(path).is_some_and(|e| CONTAINER_EXTENSIONS.contains(&e.as_str()))
}

/// Unique identity of a face: file path plus collection index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey {
    pub path: PathBuf,
    pub index: Option<u32>,
}

/// Coarse design classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    Sans,
    Serif,
    Mono,
    #[default]
    Unknown,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Sans => "sans",
            Classification::Serif => "serif",
            Classification::Mono => "mono",
            Classification::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered font face
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    /// Family name (name ID 1)
    pub family: String,
    /// Style / subfamily name (name ID 2)
    pub style: String,
    /// Full display name (name ID 4)
    pub full_name: String,
    /// Font file on disk
    pub path: PathBuf,
    /// Face index, only for container files
    pub index: Option<u32>,
    /// OS/2 weight class
    pub weight: Option<u16>,
    pub italic: Option<bool>,
    pub monospace: Option<bool>,
    pub classification: Option<Classification>,
    /// Set once during enrichment
    pub supports_accents: Option<bool>,
}

impl FontFace {
    /// Create a face from raw names, applying the usual fallbacks
    /// (`Unknown`, `Regular`, `"<family> <style>"`).
    pub fn new(family: &str, style: &str, full_name: &str, path: impl Into<PathBuf>) -> Self {
        let names = FaceNames::with_fallbacks(family, style, full_name);
        Self {
            family: names.family,
            style: names.style,
            full_name: names.full_name,
            path: path.into(),
            index: None,
            weight: None,
            italic: None,
            monospace: None,
            classification: None,
            supports_accents: None,
        }
    }

    /// Set the collection index
    pub fn with_index(mut self, index: Option<u32>) -> Self {
        self.index = index;
        self
    }

    /// Identity of this face
    pub fn key(&self) -> FaceKey {
        FaceKey {
            path: self.path.clone(),
            index: self.index,
        }
    }

    /// Index to pass to face parsers (0 for single-face files)
    pub fn face_index(&self) -> u32 {
        self.index.unwrap_or(0)
    }

    pub fn is_container(&self) -> bool {
        is_container_path(&self.path)
    }

    /// File name component of the path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path as displayed in listings, with the container index annotation
    pub fn display_path(&self, separator: &str) -> String {
        match self.index {
            Some(index) => format!("{}{}(index {})", self.path.display(), separator, index),
            None => self.path.display().to_string(),
        }
    }

    /// Copy analysed metadata onto the face
    pub fn apply_metadata(&mut self, meta: &FaceMetadata) {
        self.weight = meta.weight;
        self.italic = meta.italic;
        self.monospace = Some(meta.monospace);
        self.classification = Some(meta.classification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_detection() {
        assert!(is_container_path(Path::new("/fonts/NotoSansCJK.TTC")));
        assert!(is_container_path(Path::new("a.otc")));
        assert!(!is_container_path(Path::new("a.ttf")));
        assert!(is_font_path(Path::new("a.OTF")));
        assert!(!is_font_path(Path::new("a.pfb")));
        assert!(!is_font_path(Path::new("fonts")));
    }

    #[test]
    fn test_name_fallbacks() {
        let face = FontFace::new("", "", "", "/x/a.ttf");
        assert_eq!(face.family, "Unknown");
        assert_eq!(face.style, "Regular");
        assert_eq!(face.full_name, "Unknown Regular");

        let face = FontFace::new("Arial", "Bold", "", "/x/a.ttf");
        assert_eq!(face.full_name, "Arial Bold");
    }

    #[test]
    fn test_display_path() {
        let face = FontFace::new("A", "B", "A B", "/x/a.ttc").with_index(Some(2));
        assert_eq!(face.display_path(" "), "/x/a.ttc (index 2)");
        assert_eq!(face.face_index(), 2);
        let face = FontFace::new("A", "B", "A B", "/x/a.ttf");
        assert_eq!(face.display_path(" "), "/x/a.ttf");
        assert_eq!(face.file_name(), "a.ttf");
    }
}
