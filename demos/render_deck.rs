use std::io::Cursor;
use std::sync::Arc;

use lekha::{DeckOptions, Pointer, Question, Resolution, SlideConfig, SlideServices, render_deck};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Synthesized gradient background so the demo needs no asset files.
    let bg = image::RgbImage::from_fn(1920, 1080, |x, y| {
        image::Rgb([20, (30 + y / 20).min(255) as u8, (40 + x / 30).min(255) as u8])
    });
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(bg).write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

    let questions = vec![
        Question {
            number: 1,
            question: r"What is $\frac{1}{2} + \frac{1}{2}$?".to_owned(),
            pointers: vec![Pointer::new("A)", "$1$"), Pointer::new("B)", "2")],
            image: None,
        },
        Question {
            number: 2,
            question: "Which tool tracks source code history?".to_owned(),
            pointers: vec![
                Pointer::new("A)", "a spreadsheet"),
                Pointer::new("B)", "a version control system"),
            ],
            image: None,
        },
    ];

    let mut config = SlideConfig::default();
    config.instructor_name = "Ada Lovelace".to_owned();
    config.subtitle = "Weekly Quiz".to_owned();
    config.badge_text = "QUIZ TIME".to_owned();
    config.badge_rotation = 12.0;
    config.watermark_text = "lekha".to_owned();

    let services = Arc::new(SlideServices::new("assets/fonts"));
    let frames = render_deck(
        &questions,
        &png,
        &config,
        &services,
        &DeckOptions {
            resolution: Resolution::Preview,
            ..DeckOptions::default()
        },
    )?;

    for (i, frame) in frames.iter().enumerate() {
        let path = format!("slide_{i}.png");
        frame.to_rgb8().save(&path)?;
        println!("wrote {path} ({}x{})", frame.width, frame.height);
    }

    Ok(())
}
