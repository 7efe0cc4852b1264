//! Scoped temp files for raster samples
//!
//! Each sample takes a round trip through one temp PNG: written, read back,
//! then removed before the next sample starts. While a file exists its path
//! is in a process-wide registry, so an interrupt handler can remove it with
//! [`remove_live_files`]. Early returns and unwinding remove it through
//! [`tempfile::TempPath`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fontcat_text::RasterizedSample;
use tempfile::Builder;
use tiny_skia::Pixmap;

use crate::{RenderError, Result};

/// Temp files that exist right now
static LIVE_FILES: Mutex<BTreeSet<PathBuf>> = Mutex::new(BTreeSet::new());

fn live_files() -> std::sync::MutexGuard<'static, BTreeSet<PathBuf>> {
    LIVE_FILES.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Remove every temp file still on disk; returns how many were removed.
///
/// Meant for signal handlers, where destructors will not run.
pub fn remove_live_files() -> usize {
    let paths = std::mem::take(&mut *live_files());
    paths
        .iter()
        .filter(|path| std::fs::remove_file(path).is_ok())
        .count()
}

/// Number of temp files currently on disk
pub fn live_file_count() -> usize {
    live_files().len()
}

/// Registry entry, dropped before the file it tracks
struct LiveFile(PathBuf);

impl LiveFile {
    fn new(path: &Path) -> Self {
        live_files().insert(path.to_path_buf());
        Self(path.to_path_buf())
    }
}

impl Drop for LiveFile {
    fn drop(&mut self) {
        live_files().remove(&self.0);
    }
}

/// Temp PNG round trips for one document generation
#[derive(Debug, Default)]
pub struct TempImages {
    dir: Option<PathBuf>,
    created: usize,
}

impl TempImages {
    /// Files in the system temp directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Files in `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            created: 0,
        }
    }

    /// Write `sample` to a temp PNG, read it back and remove the file
    pub fn round_trip(&mut self, sample: &RasterizedSample) -> Result<Pixmap> {
        let mut builder = Builder::new();
        builder.prefix("fontcat-sample-").suffix(".png");
        let file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let temp = file.into_temp_path();
        let live = LiveFile::new(&temp);
        self.created += 1;

        sample.save_png(&temp)?;
        let pixmap =
            Pixmap::load_png(&temp).map_err(|e| RenderError::Pdf(format!("{}: {e}", temp.display())))?;

        drop(live);
        if let Err(err) = temp.close() {
            tracing::warn!("Could not remove temp image: {}", err);
        }
        Ok(pixmap)
    }

    /// Temp files created so far (none of them remain)
    pub fn created(&self) -> usize {
        self.created
    }
}

#[cfg(test)]
pub(crate) static TEST_LOCK: Mutex<()> = Mutex::new(());
