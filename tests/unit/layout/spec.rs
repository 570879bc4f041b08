use super::*;
use serde_json::json;

#[test]
fn default_layout_is_valid() {
    LayoutSpec::default().validate().unwrap();
}

#[test]
fn default_layout_round_trips_through_json() {
    let spec = LayoutSpec::default();
    let text = spec.to_json_pretty().unwrap();
    assert_eq!(LayoutSpec::from_json_str(&text).unwrap(), spec);
}

#[test]
fn json_shape_is_flat_per_slot() {
    let v = serde_json::to_value(LayoutSpec::default()).unwrap();
    assert_eq!(v["photo"]["x"], json!(0.2427));
    assert_eq!(v["photo"]["focus"], json!({"x": 0.5, "y": 0.5}));
    assert_eq!(v["name"]["x"], json!(0.62));
    assert_eq!(v["name"]["font"]["color"], json!("#000000"));
}

#[test]
fn optional_fields_take_defaults() {
    let doc = json!({
        "photo": {"x": 0.1, "y": 0.1, "w": 0.5, "h": 0.5},
        "name": {"x": 0.1, "y": 0.8, "font": {"family": "Inter", "base_size": 20}},
        "unit": {"x": 0.1, "y": 0.85, "font": {"family": "Inter", "base_size": 20}},
        "dob": {"x": 0.1, "y": 0.9, "font": {"family": "Inter", "base_size": 20, "color": "#ff0000"}}
    });
    let spec = LayoutSpec::from_json_str(&doc.to_string()).unwrap();
    assert_eq!(spec.photo.focus, Focus::CENTER);
    assert_eq!(spec.reference_width, REFERENCE_WIDTH);
    assert_eq!(spec.name.font.weight, 600);
    assert_eq!(spec.name.font.color, Color::BLACK);
    assert_eq!(spec.dob.font.color, Color::rgb(255, 0, 0));
}

#[test]
fn out_of_range_fraction_is_rejected() {
    let mut spec = LayoutSpec::default();
    spec.unit.anchor.y = 1.2;
    let err = spec.validate().unwrap_err();
    assert!(err.to_string().contains("unit.y"));

    let mut spec = LayoutSpec::default();
    spec.photo.rect.x = -0.01;
    assert!(spec.validate().is_err());

    let mut spec = LayoutSpec::default();
    spec.photo.rect.w = f64::NAN;
    assert!(spec.validate().is_err());
}

#[test]
fn zero_sized_photo_or_font_is_rejected() {
    let mut spec = LayoutSpec::default();
    spec.photo.rect.h = 0.0;
    assert!(spec.validate().is_err());

    let mut spec = LayoutSpec::default();
    spec.name.font.base_size = 0.0;
    assert!(spec.validate().is_err());

    let mut spec = LayoutSpec::default();
    spec.reference_width = 0.0;
    assert!(spec.validate().is_err());
}

#[test]
fn malformed_json_is_serde_error() {
    assert!(matches!(
        LayoutSpec::from_json_str("{\"photo\": 3}"),
        Err(PosterError::Serde(_))
    ));
}

#[test]
fn text_lookup_matches_fields() {
    let spec = LayoutSpec::default();
    assert_eq!(spec.text(TextField::Name), &spec.name);
    assert_eq!(spec.text(TextField::Unit), &spec.unit);
    assert_eq!(spec.text(TextField::Dob), &spec.dob);
}

#[test]
fn with_focus_overrides_photo_focus() {
    let spec = LayoutSpec::default().with_focus(Focus::new(0.0, 0.2));
    assert_eq!(spec.photo.focus, Focus::new(0.0, 0.2));
}
