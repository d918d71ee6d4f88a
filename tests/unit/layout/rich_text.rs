use super::*;

fn text(s: &str) -> Segment {
    Segment::Text(s.to_owned())
}

fn inline(s: &str) -> Segment {
    Segment::Math {
        formula: s.to_owned(),
        display: false,
    }
}

#[test]
fn plain_text_is_one_segment() {
    assert_eq!(split_segments("hello world"), vec![text("hello world")]);
}

#[test]
fn empty_string_has_no_segments() {
    assert!(split_segments("").is_empty());
}

#[test]
fn inline_math_is_extracted() {
    assert_eq!(
        split_segments("area is $x^2$ units"),
        vec![text("area is "), inline("x^2"), text(" units")]
    );
}

#[test]
fn display_math_uses_double_delimiters() {
    assert_eq!(
        split_segments(r"$$\frac{1}{2}$$"),
        vec![Segment::Math {
            formula: r"\frac{1}{2}".to_owned(),
            display: true,
        }]
    );
}

#[test]
fn multiple_formulas_keep_order() {
    assert_eq!(
        split_segments("$a$ plus $b$"),
        vec![inline("a"), text(" plus "), inline("b")]
    );
}

#[test]
fn dangling_delimiter_degrades_to_literal_text() {
    assert_eq!(split_segments("price is $5"), vec![text("price is $5")]);
    assert_eq!(split_segments("$a$ then $5"), vec![inline("a"), text(" then $5")]);
}

#[test]
fn trigger_commands_wrap_delimiter_free_text() {
    assert!(looks_like_math(r"\frac{1}{2} + 1"));
    assert!(looks_like_math(r"2 \times 3"));
    assert!(!looks_like_math("just words"));

    assert_eq!(
        split_segments(r"\frac{1}{2} + 1"),
        vec![inline(r"\frac{1}{2} + 1")]
    );
}

mod drawing {
    use super::*;
    use crate::math::MathTypesetter;
    use crate::render::surface::Surface;

    const SIZE: f64 = 28.0;

    fn draw(text: &str, max_width: f64) -> f64 {
        let math = MathTypesetter::new();
        let mut shaper = TextShaper::new();
        let mut surface = Surface::new(400, 300).unwrap();
        RichText {
            shaper: &mut shaper,
            math: &math,
        }
        .draw(&mut surface, text, None, SIZE, Rgba8::rgb(255, 255, 255), 10.0, 10.0, max_width)
    }

    #[test]
    fn empty_text_consumes_nothing() {
        assert_eq!(draw("", 300.0), 0.0);
    }

    #[test]
    fn a_single_line_consumes_one_line_height() {
        let consumed = draw("hello world", 300.0);
        assert!((consumed - SIZE * 1.2).abs() < 1e-9);
    }

    #[test]
    fn explicit_newlines_advance_lines() {
        let one = draw("hello", 300.0);
        let two = draw("hello\nworld", 300.0);
        assert!(two > one);
        assert!((two - 2.0 * SIZE * 1.2).abs() < 1e-9);
    }

    #[test]
    fn math_tile_never_shrinks_the_line_height() {
        // A tile can only grow the line beyond the plain-text advance.
        let consumed = draw(r"$\frac{1}{2}$", 300.0);
        assert!(consumed >= SIZE * 1.2);
    }

    fn system_handle() -> Option<crate::assets::fonts::FontHandle> {
        use crate::assets::fonts::{FontCache, resolve_font};
        use crate::composition::model::FontFamily;
        resolve_font(&FontCache::new(), std::path::Path::new("/nonexistent"), FontFamily::Dejavu, SIZE)
    }

    fn draw_with(handle: &crate::assets::fonts::FontHandle, text: &str, max_width: f64) -> f64 {
        let math = MathTypesetter::new();
        let mut shaper = TextShaper::new();
        let mut surface = Surface::new(600, 600).unwrap();
        RichText {
            shaper: &mut shaper,
            math: &math,
        }
        .draw(
            &mut surface,
            text,
            Some(handle),
            SIZE,
            Rgba8::rgb(255, 255, 255),
            10.0,
            10.0,
            max_width,
        )
    }

    #[test]
    fn narrow_bounds_force_wrapping() {
        let Some(handle) = system_handle() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let mut shaper = TextShaper::new();
        let word = shaper.measure("wrapping", Some(&handle), SIZE).width;

        let sentence = "wrapping happens when words exceed the bound";
        let wide = draw_with(&handle, sentence, 100.0 * word);
        let narrow = draw_with(&handle, sentence, 1.5 * word);
        assert!((wide - SIZE * 1.2).abs() < 1e-9, "one line when the bound is generous");
        assert!(narrow >= 2.0 * SIZE * 1.2, "multiple lines under a narrow bound");
    }

    #[test]
    fn oversized_token_sits_alone_without_splitting() {
        let Some(handle) = system_handle() else {
            eprintln!("skipping: no system font available");
            return;
        };
        // Wider than the bound: placed on its own line, never split.
        let consumed = draw_with(&handle, "incomprehensibilities", 10.0);
        assert!((consumed - SIZE * 1.2).abs() < 1e-9);

        // A word before it still forces the oversized token onto line two.
        let consumed = draw_with(&handle, "a incomprehensibilities", 30.0);
        assert!(consumed >= 2.0 * SIZE * 1.2);
    }

    #[test]
    fn failed_math_falls_back_to_literal_text() {
        // The broken formula degrades to plain words; one line, no panic.
        let consumed = draw(r"$\nosuchcmd{x}$", 300.0);
        assert!((consumed - SIZE * 1.2).abs() < 1e-9);
    }
}
