//! Font discovery
//!
//! Two tiers: fontconfig's `fc-list` when it is installed, otherwise a
//! recursive scan of well-known font directories. Every candidate file yields
//! a `Result`; failures go to a diagnostics list and never stop the batch.

mod fclist;
mod scan;

pub use fclist::{fc_list_available, parse_fc_list};
pub use scan::{default_roots, faces_from_file, scan_dirs};

use std::collections::HashSet;
use std::path::PathBuf;

use crate::font::{FontDatabase, FontFace};
use crate::normalize::sort_faces;

/// Per-file discovery failure
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable font face in {}", .0.display())]
    Unparseable(PathBuf),

    #[error("fc-list failed: {0}")]
    SystemIndex(String),
}

/// Where the faces came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    SystemIndex,
    DirectoryScan,
}

/// Discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Try `fc-list` before scanning directories
    pub use_system_index: bool,
    /// Roots for the directory scan
    pub roots: Vec<PathBuf>,
    /// Extra directories, scanned in both tiers
    pub extra_dirs: Vec<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            use_system_index: cfg!(feature = "system-index"),
            roots: default_roots(),
            extra_dirs: Vec::new(),
        }
    }
}

/// Result of a discovery run
#[derive(Debug, Default)]
pub struct Discovery {
    /// Unique faces in sort order
    pub faces: Vec<FontFace>,
    /// Non-fatal per-file failures
    pub diagnostics: Vec<DiscoveryError>,
    pub source: Option<DiscoverySource>,
}

impl Discovery {
    /// Fold per-file results in; failures become diagnostics
    pub fn extend(&mut self, results: impl IntoIterator<Item = Result<Vec<FontFace>, DiscoveryError>>) {
        for result in results {
            match result {
                Ok(faces) => self.faces.extend(faces),
                Err(err) => {
                    tracing::debug!("Skipping font: {}", err);
                    self.diagnostics.push(err);
                }
            }
        }
    }

    /// Drop duplicate `(path, index)` entries and sort
    pub fn finish(&mut self) {
        let mut seen = HashSet::new();
        self.faces.retain(|f| seen.insert(f.key()));
        sort_faces(&mut self.faces);
    }
}

/// Discover installed font faces
pub fn discover(db: &mut FontDatabase, config: &DiscoveryConfig) -> Discovery {
    let mut discovery = Discovery::default();

    if config.use_system_index && fc_list_available() {
        match fclist::list_with_fc_list(db) {
            Ok(faces) => {
                discovery.faces = faces;
                discovery.source = Some(DiscoverySource::SystemIndex);
            }
            Err(err) => {
                tracing::warn!("{}; falling back to directory scan", err);
                discovery.diagnostics.push(err);
            }
        }
    }

    if discovery.source.is_none() {
        discovery.extend(scan_dirs(db, &config.roots));
        discovery.source = Some(DiscoverySource::DirectoryScan);
    }

    if !config.extra_dirs.is_empty() {
        discovery.extend(scan_dirs(db, &config.extra_dirs));
    }

    discovery.finish();
    tracing::info!(
        "Discovered {} face(s) via {:?} ({} file(s) skipped)",
        discovery.faces.len(),
        discovery.source,
        discovery.diagnostics.len()
    );
    discovery
}
