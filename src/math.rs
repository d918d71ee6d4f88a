//! Formula typesetting.
//!
//! A small TeX-subset engine: [`parse`] turns a formula into an AST,
//! [`layout`] assigns box geometry, and [`engine`] paints the result into a
//! transparent tile. Sizes are device pixels throughout, so a formula tile
//! at size N occupies the same visual height as plain text drawn at N.
//! [`MathTypesetter`] is the shared front door; it
//! serializes access to the stateful engine so rendering workers can hold a
//! single instance.

pub mod engine;
pub mod layout;
pub mod parse;

use std::sync::Mutex;

pub use engine::{MathEngine, MathTile};

use crate::{assets::fonts::FontHandle, foundation::core::Rgba8};

/// Command spellings rewritten before parsing. Each alias maps to the
/// canonical command the parser and symbol table understand.
const COMMAND_ALIASES: &[(&str, &str)] = &[
    ("le", "leq"),
    ("ge", "geq"),
    ("ne", "neq"),
    ("dfrac", "frac"),
    ("tfrac", "frac"),
    ("cdots", "dots"),
    ("ldots", "dots"),
    ("to", "rightarrow"),
];

/// Rewrite alias command spellings to their canonical form.
///
/// Replacement is boundary-aware: `\le` only rewrites when the following
/// character is not a letter, so `\left` and an already-canonical `\leq`
/// pass through untouched. The function is idempotent.
pub fn normalize_latex(formula: &str) -> String {
    let mut out = formula.to_owned();
    for &(alias, canonical) in COMMAND_ALIASES {
        out = replace_command(&out, alias, canonical);
    }
    out
}

fn replace_command(input: &str, alias: &str, canonical: &str) -> String {
    let needle = format!("\\{alias}");
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(&needle) {
        let after = &rest[pos + needle.len()..];
        let boundary = !after.chars().next().is_some_and(|c| c.is_alphabetic());
        out.push_str(&rest[..pos]);
        if boundary {
            out.push('\\');
            out.push_str(canonical);
        } else {
            out.push_str(&needle);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Thread-safe formula renderer shared across rendering workers.
///
/// The inner engine carries mutable shaping state, so the lock makes formula
/// rendering a serialized section: with many formula-heavy slides in flight
/// this is the pipeline's throughput ceiling.
pub struct MathTypesetter {
    engine: Mutex<MathEngine>,
}

impl Default for MathTypesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl MathTypesetter {
    pub fn new() -> Self {
        Self {
            engine: Mutex::new(MathEngine::new()),
        }
    }

    /// Normalize and render `formula` into a tile. `None` when the formula
    /// does not parse or rasterize; the caller falls back to literal text.
    pub fn render(
        &self,
        formula: &str,
        handle: Option<&FontHandle>,
        size_px: f64,
        color: Rgba8,
    ) -> Option<MathTile> {
        let normalized = normalize_latex(formula);
        let mut engine = match self.engine.lock() {
            Ok(engine) => engine,
            Err(poisoned) => poisoned.into_inner(),
        };
        engine.render(&normalized, handle, size_px, color)
    }
}

#[cfg(test)]
#[path = "../tests/unit/math/normalize.rs"]
mod tests;
