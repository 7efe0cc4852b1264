//! Font database for loading font files and reaching their face data

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fontdb::{Database, Source, ID};

/// Font database keyed by file path.
///
/// Files are loaded lazily, once per run; face bytes are memory-mapped by
/// fontdb on each access.
pub struct FontDatabase {
    db: Database,
    /// Face ids per loaded file, in collection order
    files: HashMap<PathBuf, Vec<ID>>,
}

impl FontDatabase {
    /// Create a new empty font database
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            files: HashMap::new(),
        }
    }

    /// Load every face of a font file.
    ///
    /// Returns the ids of the faces fontdb could parse; an unreadable or
    /// unparseable file yields an empty slice. Repeated calls are cached.
    pub fn load_file(&mut self, path: &Path) -> &[ID] {
        let db = &mut self.db;
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                let ids = db.load_font_source(Source::File(path.to_path_buf()));
                tracing::trace!("Loaded {} face(s) from {}", ids.len(), path.display());
                ids.to_vec()
            })
            .as_slice()
    }

    /// Find the database id of face `index` inside `path`
    pub fn face_id(&mut self, path: &Path, index: u32) -> Option<ID> {
        let ids = self.load_file(path).to_vec();
        ids.into_iter()
            .find(|id| self.db.face(*id).is_some_and(|info| info.index == index))
    }

    /// Run `f` over the raw data of a face, loading the file if needed
    pub fn with_face_data<R>(
        &mut self,
        path: &Path,
        index: u32,
        f: impl FnOnce(&[u8], u32) -> R,
    ) -> Option<R> {
        let id = self.face_id(path, index)?;
        self.db.with_face_data(id, f)
    }

    /// Run `f` over the raw data of an already loaded face
    pub fn with_face_data_by_id<R>(&self, id: ID, f: impl FnOnce(&[u8], u32) -> R) -> Option<R> {
        self.db.with_face_data(id, f)
    }

    /// Number of loaded faces
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Number of files loaded so far (including ones without usable faces)
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_file_has_no_faces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font at all").unwrap();

        let mut db = FontDatabase::new();
        assert!(db.load_file(&path).is_empty());
        assert!(db.face_id(&path, 0).is_none());
        assert!(db.with_face_data(&path, 0, |data, _| data.len()).is_none());
        // Cached, not reloaded
        db.load_file(&path);
        assert_eq!(db.file_count(), 1);
        assert!(db.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut db = FontDatabase::new();
        assert!(db.load_file(Path::new("/nonexistent/font.ttf")).is_empty());
    }
}
