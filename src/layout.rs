//! Mixed prose-and-formula text layout.

pub mod rich_text;

pub use rich_text::{RichText, Segment, looks_like_math, split_segments};
