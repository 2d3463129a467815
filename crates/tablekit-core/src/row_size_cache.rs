//! Advisory cache of rendered row sizes.
//!
//! Entries are keyed by resolved index path and are never invalidated: after
//! sections are inserted or removed an entry may describe a different row.
//! The cache only feeds size *estimates*, so a stale entry costs at most a
//! layout jump, never a wrong layout.

use rustc_hash::FxHashMap;

use crate::surface::IndexPath;

#[derive(Debug, Default)]
pub struct RowSizeCache {
    sizes: FxHashMap<IndexPath, f32>,
}

impl RowSizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the size a row was last rendered at, superseding older entries.
    pub fn record(&mut self, path: IndexPath, size: f32) {
        if !size.is_finite() || size < 0.0 {
            log::debug!("ignoring rendered size {size} for row {path}");
            return;
        }
        self.sizes.insert(path, size);
    }

    pub fn get(&self, path: IndexPath) -> Option<f32> {
        self.sizes.get(&path).copied()
    }

    /// Cached size for `path`, or `fallback` when the row was never rendered.
    pub fn estimate(&self, path: IndexPath, fallback: f32) -> f32 {
        self.get(path).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
