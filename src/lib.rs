//! Lekha is a slide layout and rendering engine for exam-question decks.
//!
//! Given question records, a background raster, and a slide configuration,
//! it composes finished slides at full (1920×1080) or preview (960×540)
//! resolution, with a single uniform scale factor keeping layout
//! resolution-invariant.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: background and question images become premultiplied RGBA8
//!    rasters, decoded once per deck.
//! 2. **Compose**: each [`Question`] is drawn onto its own private copy of
//!    the background: header elements via the rotation compositor, the stem
//!    and answer pointers via the rich text layout engine, formulas via the
//!    math typesetter.
//! 3. **Export**: finished [`SlideFrame`]s convert to opaque 3-channel
//!    rasters for downstream assembly.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Shared services, private canvases**: font and background caches and
//!   the serialized math engine are shared across workers; every slide draws
//!   on its own raster, so no cross-slide bleed is possible.
//! - **Degradable rendering**: missing fonts, failed formulas, and bad
//!   question images fall back and log; only a corrupt background is a
//!   user-facing error.
//! - **Premultiplied RGBA8** end-to-end inside the renderer.
#![forbid(unsafe_code)]

pub mod assets;
pub mod composition;
pub mod foundation;
pub mod layout;
pub mod math;
pub mod render;

pub use composition::model::{ContentRegion, FontFamily, Pointer, Question, SlideConfig};
pub use foundation::core::{Resolution, Rgba8, SlideFrame};
pub use foundation::error::{LekhaError, LekhaResult};
pub use math::{MathTypesetter, normalize_latex};
pub use render::{DeckOptions, SlideServices, render_deck, render_slide};
