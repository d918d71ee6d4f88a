use super::*;

use crate::composition::model::{ContentRegion, Pointer};

fn services() -> Arc<SlideServices> {
    Arc::new(SlideServices::new("/nonexistent/fonts"))
}

fn background() -> image::RgbImage {
    image::RgbImage::from_fn(64, 36, |x, y| {
        image::Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 120])
    })
}

fn question(pointers: Vec<Pointer>) -> Question {
    Question {
        number: 1,
        question: "What is source control?".to_owned(),
        pointers,
        image: None,
    }
}

#[test]
fn bare_option_labels_are_detected() {
    assert!(is_bare_option_label("A)"));
    assert!(is_bare_option_label("b."));
    assert!(is_bare_option_label("C:"));
    assert!(is_bare_option_label(" d) "));
    assert!(is_bare_option_label("1)"));

    assert!(!is_bare_option_label("AB)"));
    assert!(!is_bare_option_label("Definition:"));
    assert!(!is_bare_option_label(""));
    assert!(!is_bare_option_label(")"));
}

#[test]
fn empty_pointer_list_still_yields_exact_resolution() {
    let services = services();
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let frame = composer
        .generate(
            &question(vec![]),
            &background(),
            &SlideConfig::default(),
            Resolution::Preview,
            "bg",
            true,
        )
        .unwrap();

    assert_eq!((frame.width, frame.height), (960, 540));
    // Background covers the whole canvas, so every pixel is opaque.
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn full_resolution_frame_is_1920x1080() {
    let services = services();
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let frame = composer
        .generate(
            &question(vec![Pointer::new("A)", "the answer")]),
            &background(),
            &SlideConfig::default(),
            Resolution::Full,
            "bg",
            true,
        )
        .unwrap();
    assert_eq!((frame.width, frame.height), (1920, 1080));
}

#[test]
fn undecodable_question_image_is_dropped() {
    let services = services();
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let mut q = question(vec![]);
    q.image = Some(b"definitely not an image".to_vec());

    let frame = composer
        .generate(&q, &background(), &SlideConfig::default(), Resolution::Preview, "bg", true)
        .unwrap();
    assert_eq!((frame.width, frame.height), (960, 540));
}

#[test]
fn cache_population_follows_the_use_cache_flag() {
    let services = services();
    let mut composer = SlideComposer::new(Arc::clone(&services));

    composer
        .generate(
            &question(vec![]),
            &background(),
            &SlideConfig::default(),
            Resolution::Preview,
            "bg",
            false,
        )
        .unwrap();
    assert!(services.backgrounds.is_empty());

    composer
        .generate(
            &question(vec![]),
            &background(),
            &SlideConfig::default(),
            Resolution::Preview,
            "bg",
            true,
        )
        .unwrap();
    assert_eq!(services.backgrounds.len(), 1);
}

fn font_resolves(services: &SlideServices) -> bool {
    fonts::resolve_font(&services.fonts, &services.font_dir, Default::default(), 24.0).is_some()
}

fn has_exact_pixel(frame: &SlideFrame, color: Rgba8) -> bool {
    frame
        .data
        .chunks_exact(4)
        .any(|px| px == [color.r, color.g, color.b, 255].as_slice())
}

#[test]
fn badge_fill_defaults_to_orange() {
    let services = services();
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let mut config = SlideConfig::default();
    config.badge_text = "QUIZ".to_owned();

    let frame = composer
        .generate(&question(vec![]), &background(), &config, Resolution::Preview, "bg", true)
        .unwrap();

    // Default badge box at preview scale is 175×35 at (745, 30). Sample
    // inside the fill, left of the centered label.
    let i = (47 * 960 + 755) * 4;
    assert_eq!(
        &frame.data[i..i + 4],
        &[palette::ORANGE.r, palette::ORANGE.g, palette::ORANGE.b, 255]
    );
}

#[test]
fn header_text_defaults_to_palette_colors() {
    let services = services();
    if !font_resolves(&services) {
        eprintln!("skipping: no system font available");
        return;
    }
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let mut config = SlideConfig::default();
    config.instructor_name = "Ada Lovelace".to_owned();
    config.subtitle = "Weekly Mock Test".to_owned();

    let frame = composer
        .generate(&question(vec![]), &background(), &config, Resolution::Full, "bg", true)
        .unwrap();

    // The synthetic background holds blue at 120 everywhere, so an exact
    // palette pixel can only come from the header text.
    assert!(has_exact_pixel(&frame, palette::YELLOW), "instructor name should default to yellow");
    assert!(has_exact_pixel(&frame, palette::MINT), "subtitle should default to mint");
}

#[test]
fn answer_label_is_drawn_without_pointers() {
    let services = services();
    if !font_resolves(&services) {
        eprintln!("skipping: no system font available");
        return;
    }
    let mut composer = SlideComposer::new(Arc::clone(&services));

    let frame = composer
        .generate(
            &question(vec![]),
            &background(),
            &SlideConfig::default(),
            Resolution::Full,
            "bg",
            true,
        )
        .unwrap();

    // Only the "Answer –" label uses the options color on this slide.
    assert!(has_exact_pixel(&frame, palette::OFF_WHITE));
}

#[test]
fn right_half_region_keeps_the_left_half_untouched() {
    let services = services();
    if !font_resolves(&services) {
        eprintln!("skipping: no system font available");
        return;
    }
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let source = background();
    let mut config = SlideConfig::default();
    config.content_region = ContentRegion::RightHalf;

    let frame = composer
        .generate(
            &question(vec![Pointer::new("A)", "a body kept inside the region")]),
            &source,
            &config,
            Resolution::Preview,
            "bg",
            true,
        )
        .unwrap();

    let reference = services.backgrounds.get("bg", &source, Resolution::Preview, true);
    let mut right_half_differs = false;
    for y in 0..540usize {
        for x in 0..960usize {
            let i = (y * 960 + x) * 4;
            let same = frame.data[i..i + 4] == reference.rgba8_premul[i..i + 4];
            if x < 480 {
                assert!(same, "left half touched at ({x}, {y})");
            } else if !same {
                right_half_differs = true;
            }
        }
    }
    assert!(right_half_differs, "stem and pointers should land in the right half");
}

#[test]
fn content_region_and_rotation_options_compose() {
    let services = services();
    let mut composer = SlideComposer::new(Arc::clone(&services));
    let mut config = SlideConfig::default();
    config.content_region = crate::composition::model::ContentRegion::RightHalf;
    config.badge_text = "QUIZ TIME".to_owned();
    config.badge_rotation = 20.0;
    config.instructor_name = "Ada".to_owned();
    config.instructor_rotation = -10.0;
    config.watermark_text = "lekha".to_owned();

    let frame = composer
        .generate(
            &question(vec![Pointer::new("A)", "left-anchored body")]),
            &background(),
            &config,
            Resolution::Preview,
            "bg",
            true,
        )
        .unwrap();
    assert_eq!((frame.width, frame.height), (960, 540));
}
