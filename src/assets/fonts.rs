use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    composition::model::FontFamily,
    foundation::core::Rgba8,
};

/// System typeface files probed, in order, when neither the configured family
/// nor the bundled default can be loaded from the font directory.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Chalkboard.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Immutable handle to a loaded typeface at a fixed size.
///
/// Cloning is cheap (the backing bytes are shared); the handle itself is never
/// mutated after the cache populates it.
#[derive(Clone)]
pub struct FontHandle {
    /// Normalized source path, used as the shaper registration key.
    pub path: String,
    /// Requested size in device pixels.
    pub size_px: f64,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Paint-side font used when filling glyph runs.
    pub data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("path", &self.path)
            .field("size_px", &self.size_px)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FontKey {
    path: String,
    /// Size in tenths of a pixel so the key stays `Eq + Hash`.
    size_decipx: u32,
}

/// Memoizes loaded font handles keyed by `(font-file-path, size)`.
///
/// Safe under concurrent callers: the check-then-insert runs inside the lock.
/// Load failures are not cached; font unavailability is never fatal, callers
/// fall down the chain in [`resolve_font`] instead.
#[derive(Default)]
pub struct FontCache {
    inner: Mutex<HashMap<FontKey, FontHandle>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or reuse) the font file at `path` for the given size.
    pub fn get(&self, path: &Path, size_px: f64) -> Option<FontHandle> {
        let key = FontKey {
            path: path.to_string_lossy().into_owned(),
            size_decipx: (size_px.max(0.0) * 10.0).round() as u32,
        };

        let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = map.get(&key) {
            return Some(handle.clone());
        }

        let bytes = match std::fs::read(path) {
            Ok(b) => Arc::new(b),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "font file not loadable");
                return None;
            }
        };
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        let handle = FontHandle {
            path: key.path.clone(),
            size_px,
            bytes,
            data,
        };
        map.insert(key, handle.clone());
        Some(handle)
    }

    /// Drop every cached handle, typically between generation sessions.
    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }

    /// Number of populated entries (test hook).
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve the active typeface for a slide: configured family file, then the
/// bundled default family, then known system font locations. Each step logs
/// and degrades; `None` means text is shaped against the generic sans stack
/// and glyph painting is skipped.
pub fn resolve_font(
    cache: &FontCache,
    font_dir: &Path,
    family: FontFamily,
    size_px: f64,
) -> Option<FontHandle> {
    let configured = font_dir.join(family.file_name());
    if let Some(handle) = cache.get(&configured, size_px) {
        return Some(handle);
    }
    tracing::warn!(family = ?family, path = %configured.display(), "configured typeface unavailable, trying bundled default");

    if family != FontFamily::Dejavu {
        let bundled = font_dir.join(FontFamily::Dejavu.file_name());
        if let Some(handle) = cache.get(&bundled, size_px) {
            return Some(handle);
        }
        tracing::warn!(path = %bundled.display(), "bundled default typeface unavailable, trying system fonts");
    }

    for candidate in SYSTEM_FONT_CANDIDATES {
        if let Some(handle) = cache.get(&PathBuf::from(candidate), size_px) {
            return Some(handle);
        }
    }
    tracing::warn!("no typeface could be loaded; glyph painting will be skipped");
    None
}

/// Measured extents of a shaped single run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    /// Distance from the first line's top to its baseline.
    pub ascent: f64,
}

/// Stateful helper for building Parley text layouts, one per render worker.
///
/// Fonts are registered into the shaping context once per source path; repeat
/// shapes reuse the resolved family.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    registered: HashMap<String, String>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    /// Construct a new shaper with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, handle: &FontHandle) -> Option<String> {
        if let Some(name) = self.registered.get(&handle.path) {
            return Some(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(handle.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id)?;
        let name = self.font_ctx.collection.family_name(family_id)?.to_string();
        self.registered.insert(handle.path.clone(), name.clone());
        Some(name)
    }

    /// Shape `text` as a single unbroken run at `size_px`.
    pub fn shape(
        &mut self,
        text: &str,
        handle: Option<&FontHandle>,
        size_px: f64,
        brush: Rgba8,
    ) -> parley::Layout<Rgba8> {
        let family = handle.and_then(|h| self.family_for(h));
        let stack: std::borrow::Cow<'static, str> = match family {
            Some(name) => std::borrow::Cow::Owned(name),
            None => std::borrow::Cow::Borrowed("sans-serif"),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(stack),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Measure `text` without keeping the layout.
    pub fn measure(&mut self, text: &str, handle: Option<&FontHandle>, size_px: f64) -> TextMetrics {
        let layout = self.shape(text, handle, size_px, Rgba8::default());
        metrics_of(&layout)
    }
}

/// Extents of an already shaped layout.
pub fn metrics_of(layout: &parley::Layout<Rgba8>) -> TextMetrics {
    TextMetrics {
        width: f64::from(layout.width()),
        height: f64::from(layout.height()),
        ascent: layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().ascent))
            .unwrap_or(0.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
