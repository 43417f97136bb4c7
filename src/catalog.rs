use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use log::{debug, info, warn};

use crate::error::{Error, Result};

/// File extensions (compared case-insensitively) that are treated as tiles.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["webp", "png"];

/// Returns `true` if `path` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

// ── TileCatalog ───────────────────────────────────────────────────────────────

/// Decoded tile images keyed by tile type (the file stem).
///
/// Built once at startup and read-only afterwards. Iteration order of the
/// underlying map is unspecified; use [`TileCatalog::tile_types`] when a
/// stable order matters.
#[derive(Debug, Default)]
pub struct TileCatalog {
    tiles: HashMap<String, RgbaImage>,
}

impl TileCatalog {
    /// Scan the direct children of `folder` for supported image files and
    /// decode each into an RGBA image keyed by its file stem.
    ///
    /// Files are visited in file-name order so that, when two files share a
    /// stem (`grass.png` and `grass.webp`), the same one wins on every run.
    /// Duplicates and undecodable files are logged and skipped.  Only a
    /// failure to read `folder` itself is an error.
    pub fn load_folder(folder: impl AsRef<Path>) -> Result<Self> {
        let folder = folder.as_ref();
        let mut tiles = HashMap::new();

        let walker = walkdir::WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() == 0 => {
                    return Err(Error::TilesetDir { path: folder.to_path_buf(), source });
                }
                Err(e) => {
                    warn!("tileset: unreadable entry in {}: {e}; skipping", folder.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_supported(entry.path()) {
                continue;
            }

            let path = entry.path();
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).filter(|n| !n.is_empty())
            else {
                warn!("tileset: {:?} has no usable name; skipping", path);
                continue;
            };

            if tiles.contains_key(name) {
                warn!("tileset: duplicate tile type '{name}' from {:?}; skipping", path);
                continue;
            }

            match image::open(path) {
                Ok(img) => {
                    tiles.insert(name.to_string(), img.to_rgba8());
                }
                Err(e) => warn!("tileset: failed to decode {:?}: {e}; skipping", path),
            }
        }

        let catalog = Self { tiles };
        info!("tileset: loaded {} tile type(s) from {}", catalog.len(), folder.display());
        debug!("tileset: types = {:?}", catalog.tile_types());
        Ok(catalog)
    }

    /// Like [`load_folder`](Self::load_folder) but rejects a folder that
    /// produced no tiles, since nothing can be generated from it.
    pub fn load_non_empty(folder: impl AsRef<Path>) -> Result<Self> {
        let folder = folder.as_ref();
        let catalog = Self::load_folder(folder)?;
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog { path: folder.to_path_buf() });
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, tile_type: impl Into<String>, image: RgbaImage) {
        self.tiles.insert(tile_type.into(), image);
    }

    pub fn get(&self, tile_type: &str) -> Option<&RgbaImage> {
        self.tiles.get(tile_type)
    }

    pub fn contains(&self, tile_type: &str) -> bool {
        self.tiles.contains_key(tile_type)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tile types, sorted.
    pub fn tile_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.tiles.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported(Path::new("grass.webp")));
        assert!(is_supported(Path::new("grass.PNG")));
        assert!(is_supported(Path::new("dir/water.WebP")));
    }

    #[test]
    fn other_extensions_are_rejected() {
        assert!(!is_supported(Path::new("grass.jpg")));
        assert!(!is_supported(Path::new("readme.txt")));
        assert!(!is_supported(Path::new("webp")));
    }

    #[test]
    fn tile_types_are_sorted() {
        let mut cat = TileCatalog::default();
        cat.insert("water", RgbaImage::new(1, 1));
        cat.insert("grass", RgbaImage::new(1, 1));
        cat.insert("rock", RgbaImage::new(1, 1));
        assert_eq!(cat.tile_types(), vec!["grass", "rock", "water"]);
    }
}
