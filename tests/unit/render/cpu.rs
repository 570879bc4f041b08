use super::*;
use crate::{
    compositor::{Focus, cover_placement},
    layout::spec::LayoutSpec,
    render::poster::{PosterInputs, PosterRenderer, PosterText},
};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn near(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter().zip(want.iter()).all(|(a, b)| a.abs_diff(*b) <= 2)
}

/// 200x100 image: green on the left half, blue on the right half.
fn split_photo() -> Image {
    let mut data = Vec::with_capacity(200 * 100 * 4);
    for _y in 0..100 {
        for x in 0..200 {
            data.extend_from_slice(if x < 100 { &GREEN } else { &BLUE });
        }
    }
    Image::from_premul_rgba8(200, 100, data).unwrap()
}

fn try_system_font() -> Option<FontBook> {
    let candidates = [
        std::env::var("POSTERKIT_TEST_FONT").ok(),
        Some("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_owned()),
        Some("/usr/share/fonts/dejavu/DejaVuSans.ttf".to_owned()),
        Some("/System/Library/Fonts/Supplemental/Arial.ttf".to_owned()),
    ];
    for path in candidates.into_iter().flatten() {
        if let Ok(bytes) = std::fs::read(&path) {
            return FontBook::from_bytes(bytes).ok();
        }
    }
    None
}

#[test]
fn oversized_target_is_rejected() {
    let err = CpuTarget::new(70_000, 10, &FontBook::new()).unwrap_err();
    assert!(err.to_string().contains("exceeds u16"));
    assert!(CpuTarget::new(0, 10, &FontBook::new()).is_err());
}

#[test]
fn fresh_target_is_transparent() {
    let mut target = CpuTarget::new(4, 3, &FontBook::new()).unwrap();
    assert_eq!(target.size(), Canvas::new(4, 3));
    let frame = target.snapshot();
    assert_eq!(frame.data.len(), 4 * 3 * 4);
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn template_fills_surface() {
    let template = Image::solid(32, 32, RED).unwrap();
    let mut target = CpuTarget::for_template(&template, &FontBook::new()).unwrap();
    target
        .draw_image(&template, CropRect::full(32.0, 32.0), target.size().rect())
        .unwrap();
    let frame = target.snapshot();
    for (x, y) in [(0, 0), (31, 31), (16, 5)] {
        assert!(near(frame.pixel(x, y).unwrap(), RED), "pixel {x},{y}");
    }
}

#[test]
fn photo_is_cover_cropped_into_slot() {
    let template = Image::solid(64, 64, RED).unwrap();
    let photo = split_photo();
    let slot = Rect::new(10.0, 10.0, 60.0, 60.0);

    let mut target = CpuTarget::for_template(&template, &FontBook::new()).unwrap();
    target
        .draw_image(&template, CropRect::full(64.0, 64.0), target.size().rect())
        .unwrap();
    let p = cover_placement(photo.width, photo.height, slot, Focus::CENTER);
    target.draw_image(&photo, p.crop, p.dest).unwrap();
    let frame = target.snapshot();

    // Centered crop keeps source columns 50..150: green on the left, blue on the right.
    assert!(near(frame.pixel(13, 35).unwrap(), GREEN));
    assert!(near(frame.pixel(57, 35).unwrap(), BLUE));
    // Outside the slot the template shows through.
    assert!(near(frame.pixel(5, 35).unwrap(), RED));
    assert!(near(frame.pixel(35, 63).unwrap(), RED));
}

#[test]
fn focus_left_keeps_left_edge_of_photo() {
    let template = Image::solid(64, 64, RED).unwrap();
    let photo = split_photo();
    let slot = Rect::new(10.0, 10.0, 60.0, 60.0);

    let mut target = CpuTarget::for_template(&template, &FontBook::new()).unwrap();
    let p = cover_placement(photo.width, photo.height, slot, Focus::new(0.0, 0.5));
    target.draw_image(&photo, p.crop, p.dest).unwrap();
    let frame = target.snapshot();

    assert!(near(frame.pixel(13, 35).unwrap(), GREEN));
    assert!(near(frame.pixel(50, 35).unwrap(), GREEN));
}

#[test]
fn clear_discards_previous_draws() {
    let template = Image::solid(8, 8, BLUE).unwrap();
    let mut target = CpuTarget::for_template(&template, &FontBook::new()).unwrap();
    target
        .draw_image(&template, CropRect::full(8.0, 8.0), target.size().rect())
        .unwrap();
    target.clear().unwrap();
    assert!(target.snapshot().data.iter().all(|b| *b == 0));
}

#[test]
fn text_without_fonts_is_a_font_error() {
    let mut target = CpuTarget::new(16, 16, &FontBook::new()).unwrap();
    let font = ResolvedFont {
        family: "Archivo Black".to_owned(),
        size_px: 12.0,
        weight: 600,
        color: Color::BLACK,
    };
    let err = target
        .draw_text("Jane", Point::new(1.0, 12.0), &font)
        .unwrap_err();
    assert!(matches!(err, PosterError::Font(_)));
}

#[test]
fn rendering_is_byte_identical_across_runs() {
    let template = Image::solid(120, 150, [200, 180, 160, 255]).unwrap();
    let photo = split_photo();
    let fonts = try_system_font().unwrap_or_default();
    let text = if fonts.is_empty() {
        PosterText::default()
    } else {
        PosterText::new("Jane", "", "2000-01-01")
    };
    let renderer = PosterRenderer::new(LayoutSpec::default()).unwrap();
    let inputs = PosterInputs {
        template: Some(&template),
        photo: Some(&photo),
        text: &text,
    };

    let mut target = CpuTarget::for_template(&template, &fonts).unwrap();
    renderer.render(&mut target, &inputs).unwrap();
    let first = target.snapshot();
    renderer.render(&mut target, &inputs).unwrap();
    let second = target.snapshot();
    assert_eq!(first, second);

    let mut fresh = CpuTarget::for_template(&template, &fonts).unwrap();
    renderer.render(&mut fresh, &inputs).unwrap();
    assert_eq!(first, fresh.snapshot());
}

#[test]
fn text_changes_pixels_near_anchor_with_local_font_if_present() {
    let Some(fonts) = try_system_font() else {
        return;
    };
    let template = Image::solid(200, 100, [255, 255, 255, 255]).unwrap();
    let mut target = CpuTarget::for_template(&template, &fonts).unwrap();
    target
        .draw_image(&template, CropRect::full(200.0, 100.0), target.size().rect())
        .unwrap();
    let font = ResolvedFont {
        family: "Some Family That Is Not Installed".to_owned(),
        size_px: 40.0,
        weight: 600,
        color: Color::BLACK,
    };
    target
        .draw_text("HH", Point::new(10.0, 60.0), &font)
        .unwrap();
    let frame = target.snapshot();

    let dark_above_baseline = (10..120)
        .flat_map(|x| (25..60).map(move |y| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|p| p[0] < 128))
        .count();
    assert!(dark_above_baseline > 0);

    let dark_far_below = (0..200)
        .flat_map(|x| (80..100).map(move |y| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|p| p[0] < 128))
        .count();
    assert_eq!(dark_far_below, 0);
}

fn read_dejavu(file: &str) -> Option<Vec<u8>> {
    ["/usr/share/fonts/truetype/dejavu", "/usr/share/fonts/dejavu"]
        .iter()
        .find_map(|dir| std::fs::read(format!("{dir}/{file}")).ok())
}

fn draw_label(fonts: &FontBook, weight: u16) -> FrameRGBA {
    let template = Image::solid(240, 80, [255, 255, 255, 255]).unwrap();
    let mut target = CpuTarget::for_template(&template, fonts).unwrap();
    target
        .draw_image(&template, CropRect::full(240.0, 80.0), target.size().rect())
        .unwrap();
    let font = ResolvedFont {
        family: "DejaVu Sans".to_owned(),
        size_px: 32.0,
        weight,
        color: Color::BLACK,
    };
    target
        .draw_text("Wide Bold", Point::new(8.0, 50.0), &font)
        .unwrap();
    target.snapshot()
}

#[test]
fn glyphs_come_from_the_face_chosen_for_the_weight() {
    let (Some(regular), Some(bold)) = (
        read_dejavu("DejaVuSans.ttf"),
        read_dejavu("DejaVuSans-Bold.ttf"),
    ) else {
        return;
    };

    let mut both = FontBook::from_bytes(regular).unwrap();
    both.add_bytes(bold.clone()).unwrap();
    let bold_only = FontBook::from_bytes(bold).unwrap();

    // Regular is registered first; a bold request must still rasterize the bold outlines.
    let from_family = draw_label(&both, 700);
    assert_eq!(from_family, draw_label(&bold_only, 700));
    assert_ne!(from_family, draw_label(&both, 400));
}
