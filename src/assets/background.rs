use std::{collections::HashMap, sync::Mutex};

use crate::assets::decode::{PreparedImage, rgb_to_prepared};
use crate::foundation::core::Resolution;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct BackgroundKey {
    id: String,
    width: u32,
    height: u32,
}

/// Memoizes a source background resized to a target resolution.
///
/// Entries are immutable once populated; lookups hand out shared-byte copies
/// and every caller draws onto its own slide surface, so no cross-slide bleed
/// is possible. Guarded by a single mutex around the map.
#[derive(Default)]
pub struct BackgroundCache {
    inner: Mutex<HashMap<BackgroundKey, PreparedImage>>,
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the background identified by `id` resized to `resolution`.
    ///
    /// `use_cache = false` always performs a fresh resize and never consults
    /// or populates the cache; use it when a background is known to be used
    /// exactly once.
    pub fn get(
        &self,
        id: &str,
        source: &image::RgbImage,
        resolution: Resolution,
        use_cache: bool,
    ) -> PreparedImage {
        if !use_cache {
            return resize_background(source, resolution);
        }

        let key = BackgroundKey {
            id: id.to_string(),
            width: resolution.width(),
            height: resolution.height(),
        };

        let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(entry) = map.get(&key) {
            return entry.clone();
        }
        let prepared = resize_background(source, resolution);
        map.insert(key, prepared.clone());
        prepared
    }

    /// Drop every cached raster, typically between generation sessions.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }

    /// Number of populated entries (test hook).
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resize the opaque source to the target resolution.
///
/// Preview downscales take the cheaper triangle filter; everything else uses
/// Lanczos for quality.
fn resize_background(source: &image::RgbImage, resolution: Resolution) -> PreparedImage {
    let (w, h) = (resolution.width(), resolution.height());
    let downscaling = source.width() > w && source.height() > h;
    let filter = if resolution == Resolution::Preview && downscaling {
        image::imageops::FilterType::Triangle
    } else {
        image::imageops::FilterType::Lanczos3
    };
    let resized = image::imageops::resize(source, w, h, filter);
    rgb_to_prepared(&resized)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
