//! Deck-level rendering pipeline.
//!
//! Shared services are injected into per-worker composers; a bounded rayon
//! pool renders slides in parallel and results come back in input order.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    assets::{background::BackgroundCache, decode, fonts::FontCache},
    composition::model::{Question, SlideConfig},
    foundation::core::{Resolution, SlideFrame},
    foundation::error::LekhaResult,
    math::MathTypesetter,
    render::composer::SlideComposer,
};

/// Upper bound on the source background's longer edge before fan-out.
const BACKGROUND_MAX_DIMENSION: u32 = 1920;

/// Shared, synchronized state for a generation session: both caches plus
/// the serialized formula typesetter, and the directory typefaces load from.
pub struct SlideServices {
    pub fonts: FontCache,
    pub backgrounds: BackgroundCache,
    pub math: MathTypesetter,
    pub font_dir: PathBuf,
}

impl SlideServices {
    pub fn new(font_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts: FontCache::new(),
            backgrounds: BackgroundCache::new(),
            math: MathTypesetter::new(),
            font_dir: font_dir.into(),
        }
    }

    /// Drop all cached fonts and backgrounds. Call between independent
    /// sessions to bound memory growth from many distinct backgrounds.
    pub fn clear_caches(&self) {
        self.fonts.clear();
        self.backgrounds.clear();
    }
}

/// Deck rendering knobs.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub resolution: Resolution,
    /// Parallel slide workers.
    pub workers: usize,
    /// When false, every slide resizes the background fresh and the cache
    /// stays untouched.
    pub use_cache: bool,
    /// Cache identity of the background raster.
    pub background_id: String,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::Full,
            workers: 4,
            use_cache: true,
            background_id: "default".to_owned(),
        }
    }
}

/// Render every question in order against one shared background.
///
/// The background is decoded and size-bounded once before fan-out; workers
/// only request resized copies from the cache. Output order matches input
/// order regardless of completion order.
#[tracing::instrument(skip_all, fields(slides = questions.len(), resolution = ?opts.resolution))]
pub fn render_deck(
    questions: &[Question],
    background_bytes: &[u8],
    config: &SlideConfig,
    services: &Arc<SlideServices>,
    opts: &DeckOptions,
) -> LekhaResult<Vec<SlideFrame>> {
    let background = decode::decode_background(background_bytes)?;
    let background = decode::compress_background(background, BACKGROUND_MAX_DIMENSION);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.workers.max(1))
        .build()
        .context("building slide worker pool")?;

    pool.install(|| {
        questions
            .par_iter()
            .map_init(
                || SlideComposer::new(Arc::clone(services)),
                |composer, question| {
                    composer.generate(
                        question,
                        &background,
                        config,
                        opts.resolution,
                        &opts.background_id,
                        opts.use_cache,
                    )
                },
            )
            .collect()
    })
}

/// Render a single slide without touching the background cache.
pub fn render_slide(
    question: &Question,
    background_bytes: &[u8],
    config: &SlideConfig,
    services: &Arc<SlideServices>,
    resolution: Resolution,
) -> LekhaResult<SlideFrame> {
    let background = decode::decode_background(background_bytes)?;
    let background = decode::compress_background(background, BACKGROUND_MAX_DIMENSION);
    let mut composer = SlideComposer::new(Arc::clone(services));
    composer.generate(question, &background, config, resolution, "single", false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
