//! Directory scan tier

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::DiscoveryError;
use crate::font::{is_container_path, is_font_path, FontDatabase, FontFace, ParsedFace};

/// Well-known font install locations for this platform
pub fn default_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        roots.push(home.join(".local/share/fonts"));
        roots.push(home.join(".fonts"));
        if cfg!(target_os = "macos") {
            roots.push(home.join("Library/Fonts"));
        }
    }
    roots.push(PathBuf::from("/usr/share/texlive/texmf-dist/fonts"));

    if cfg!(target_os = "macos") {
        roots.push(PathBuf::from("/Library/Fonts"));
        roots.push(PathBuf::from("/System/Library/Fonts"));
    }
    if cfg!(windows) {
        let windir = std::env::var_os("WINDIR").map(PathBuf::from);
        roots.push(windir.unwrap_or_else(|| PathBuf::from("C:\\Windows")).join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA").map(PathBuf::from) {
            roots.push(local.join("Microsoft\\Windows\\Fonts"));
        }
    }
    roots
}

/// Walk `roots` recursively and load every font file found.
///
/// Missing roots are skipped silently; unreadable directories and
/// unparseable files come back as `Err` entries.
pub fn scan_dirs(
    db: &mut FontDatabase,
    roots: &[PathBuf],
) -> Vec<Result<Vec<FontFace>, DiscoveryError>> {
    let mut results = Vec::new();

    for root in roots {
        if !root.is_dir() {
            tracing::trace!("Font root {} not present", root.display());
            continue;
        }
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    results.push(Err(DiscoveryError::Io {
                        path,
                        source: err.into(),
                    }));
                    continue;
                }
            };
            if entry.file_type().is_file() && is_font_path(entry.path()) {
                results.push(faces_from_file(db, entry.path()));
            }
        }
    }

    results
}

/// Read every face of one font file.
///
/// A container (`.ttc` / `.otc`) yields one face per embedded face with its
/// index; single-face files carry no index.
pub fn faces_from_file(db: &mut FontDatabase, path: &Path) -> Result<Vec<FontFace>, DiscoveryError> {
    let ids = db.load_file(path).to_vec();
    if ids.is_empty() {
        return Err(match std::fs::metadata(path) {
            Err(source) => DiscoveryError::Io {
                path: path.to_path_buf(),
                source,
            },
            Ok(_) => DiscoveryError::Unparseable(path.to_path_buf()),
        });
    }

    let container = is_container_path(path);
    let mut faces = Vec::with_capacity(ids.len());

    for id in ids {
        let parsed = db
            .with_face_data_by_id(id, |data, index| {
                let face = ParsedFace::parse(data, index).ok()?;
                let names = face.names();
                let meta = face.metadata(&names.family);
                Some((names, meta, index))
            })
            .flatten();

        if let Some((names, meta, index)) = parsed {
            let mut face = FontFace::new(&names.family, &names.style, &names.full_name, path)
                .with_index(container.then_some(index));
            face.apply_metadata(&meta);
            faces.push(face);
        }
    }

    if faces.is_empty() {
        return Err(DiscoveryError::Unparseable(path.to_path_buf()));
    }
    Ok(faces)
}
