//! Rasterization: painting surface, rotation compositing, slide
//! orchestration, and the deck pipeline.

pub mod composer;
pub mod pipeline;
pub mod rotate;
pub mod surface;

pub use composer::SlideComposer;
pub use pipeline::{DeckOptions, SlideServices, render_deck, render_slide};
pub use surface::Surface;
