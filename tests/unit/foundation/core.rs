use super::*;

#[test]
fn premul_roundtrip_opaque_is_identity() {
    let p = Rgba8Premul::from_straight_rgba(10, 128, 250, 255);
    assert_eq!(p, Rgba8Premul { r: 10, g: 128, b: 250, a: 255 });
    assert_eq!(p.to_straight_rgba(), [10, 128, 250, 255]);
}

#[test]
fn premul_half_alpha() {
    let p = Rgba8Premul::from_straight_rgba(200, 100, 0, 128);
    assert_eq!(p.r, ((200u16 * 128 + 127) / 255) as u8);
    assert_eq!(p.g, ((100u16 * 128 + 127) / 255) as u8);
    assert_eq!(p.b, 0);
    let back = p.to_straight_rgba();
    assert!(back[0].abs_diff(200) <= 1);
    assert!(back[1].abs_diff(100) <= 1);
}

#[test]
fn premultiply_buffer_zeroes_fully_transparent_pixels() {
    let mut buf = vec![255, 255, 255, 0, 100, 50, 200, 255];
    premultiply_rgba8_in_place(&mut buf);
    assert_eq!(buf, vec![0, 0, 0, 0, 100, 50, 200, 255]);
}

#[test]
fn canvas_rect_covers_surface() {
    let c = Canvas::new(1080, 1350);
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 1080.0, 1350.0));
}
