use super::*;

use crate::foundation::core::SlideFrame;

fn alpha_centroid(frame: &SlideFrame) -> (f64, f64) {
    let (mut sx, mut sy, mut total) = (0.0, 0.0, 0.0);
    for y in 0..frame.height {
        for x in 0..frame.width {
            let a = f64::from(frame.data[((y * frame.width + x) * 4 + 3) as usize]);
            sx += f64::from(x) * a;
            sy += f64::from(y) * a;
            total += a;
        }
    }
    assert!(total > 0.0, "nothing was drawn");
    (sx / total, sy / total)
}

fn badge_frame(angle_deg: f64) -> SlideFrame {
    let mut surface = Surface::new(200, 200).unwrap();
    let mut shaper = TextShaper::new();
    draw_rotated_badge(
        &mut surface,
        &mut shaper,
        "QUIZ",
        None,
        24.0,
        Rgba8::rgb(240, 200, 60),
        palette::DARK,
        60.0,
        80.0,
        80.0,
        40.0,
        angle_deg,
    )
    .unwrap();
    surface.finish()
}

#[test]
fn unrotated_badge_lands_at_its_coordinates() {
    let frame = badge_frame(0.0);
    // Box center at (100, 100) carries the fill color.
    let i = (100 * 200 + 100) * 4;
    assert_eq!(&frame.data[i..i + 4], &[240, 200, 60, 255]);
    // Outline ring along the left edge midpoint.
    let j = (100 * 200 + 61) * 4;
    assert_eq!(&frame.data[j..j + 4], &[palette::DARK.r, palette::DARK.g, palette::DARK.b, 255]);
    // Outside the box stays transparent.
    let k = (10 * 200 + 10) * 4;
    assert_eq!(frame.data[k + 3], 0);
}

#[test]
fn rotation_preserves_the_bounding_box_center() {
    let reference = alpha_centroid(&badge_frame(0.0));
    for angle in [15.0, 45.0, 90.0, 180.0, -30.0] {
        let rotated = alpha_centroid(&badge_frame(angle));
        assert!(
            (rotated.0 - reference.0).abs() < 1.5 && (rotated.1 - reference.1).abs() < 1.5,
            "centroid drifted at {angle}°: {reference:?} vs {rotated:?}"
        );
    }
}

#[test]
fn positive_angles_rotate_clockwise() {
    // At +30° the badge's right half tilts downward in the y-down frame:
    // a sample below the centerline falls inside, one above falls outside.
    let frame = badge_frame(30.0);
    let inside = ((115 * 200 + 126) * 4) as usize;
    let outside = ((85 * 200 + 126) * 4) as usize;
    assert_eq!(frame.data[inside + 3], 255, "clockwise sample should be covered");
    assert_eq!(frame.data[outside + 3], 0, "counter-clockwise sample should be empty");
}

#[test]
fn rotated_text_without_a_typeface_is_a_no_op() {
    let mut surface = Surface::new(64, 64).unwrap();
    let mut shaper = TextShaper::new();
    draw_rotated_text(
        &mut surface,
        &mut shaper,
        "hello",
        None,
        24.0,
        Rgba8::rgb(255, 255, 255),
        10.0,
        10.0,
        30.0,
    )
    .unwrap();
    assert!(surface.finish().data.iter().all(|&b| b == 0));
}
