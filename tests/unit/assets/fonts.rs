use std::path::Path;

use super::*;

/// First system typeface present on this machine, if any. Tests that need a
/// real font file bail out quietly when the machine has none.
fn system_font() -> Option<&'static Path> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
}

#[test]
fn missing_file_is_not_cached() {
    let cache = FontCache::new();
    assert!(cache.get(Path::new("/definitely/not/a/font.ttf"), 24.0).is_none());
    assert!(cache.is_empty());
}

#[test]
fn cache_keys_on_path_and_size() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let cache = FontCache::new();

    let a = cache.get(font, 24.0).unwrap();
    let b = cache.get(font, 24.0).unwrap();
    assert!(Arc::ptr_eq(&a.bytes, &b.bytes));
    assert_eq!(cache.len(), 1);

    cache.get(font, 48.0).unwrap();
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn resolve_falls_back_to_system_fonts() {
    let cache = FontCache::new();
    let resolved = resolve_font(&cache, Path::new("/nonexistent"), FontFamily::Chalkboard, 24.0);
    assert_eq!(resolved.is_some(), system_font().is_some());
}

#[test]
fn shaping_measures_monotonically_with_size() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let cache = FontCache::new();
    let handle = cache.get(font, 24.0).unwrap();
    let mut shaper = TextShaper::new();

    let small = shaper.measure("Revision", Some(&handle), 24.0);
    let large = shaper.measure("Revision", Some(&handle), 48.0);
    assert!(small.width > 0.0);
    assert!(large.width > small.width);
    assert!(large.height > small.height);
    assert!(small.ascent > 0.0 && small.ascent <= small.height);
}

#[test]
fn longer_text_is_wider() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let cache = FontCache::new();
    let handle = cache.get(font, 32.0).unwrap();
    let mut shaper = TextShaper::new();

    let short = shaper.measure("ab", Some(&handle), 32.0);
    let long = shaper.measure("abcdef", Some(&handle), 32.0);
    assert!(long.width > short.width);
}
