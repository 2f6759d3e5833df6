use super::*;
use serde_json::json;

fn c(s: &str) -> Color {
    Color::parse(s).unwrap()
}

#[test]
fn solid_passes_color_through() {
    let paint = resolve_paint(&FillSpec::solid(c("#123456")), 300.0);
    assert_eq!(paint, Paint::Solid(c("#123456")));
}

#[test]
fn linear_spans_corner_to_corner_in_order() {
    let paint = resolve_paint(&FillSpec::linear(c("#000000"), c("#4f46e5")), 300.0);
    let Paint::Linear { start, end, stops } = paint else {
        panic!("expected linear paint");
    };
    assert_eq!(start, Point::ZERO);
    assert_eq!(end, Point::new(300.0, 300.0));
    assert_eq!(stops[0].as_str(), "#000000");
    assert_eq!(stops[1].as_str(), "#4f46e5");
}

#[test]
fn radial_is_centered_with_fixed_radii() {
    let paint = resolve_paint(&FillSpec::radial(c("#ff0000"), c("#0000ff")), 300.0);
    let Paint::Radial {
        center,
        inner_radius,
        outer_radius,
        stops,
    } = paint
    else {
        panic!("expected radial paint");
    };
    assert_eq!(center, Point::new(150.0, 150.0));
    assert!((inner_radius - 30.0).abs() < 1e-9);
    assert!((outer_radius - 200.0).abs() < 1e-9);
    assert_eq!(stops[0], c("#ff0000"));
}

#[test]
fn unknown_gradient_kind_degrades_to_primary_solid() {
    let fill = FillSpec::from_parts("conic-gradient", c("#111111"), Some(c("#222222")));
    assert_eq!(fill, FillSpec::solid(c("#111111")));
}

#[test]
fn gradient_without_second_color_degrades_to_solid() {
    let fill = FillSpec::from_parts("linear-gradient", c("#111111"), None);
    assert_eq!(fill, FillSpec::solid(c("#111111")));
}

#[test]
fn kind_names_accept_css_style_aliases() {
    assert_eq!(GradientKind::parse("linear-gradient"), Some(GradientKind::Linear));
    assert_eq!(GradientKind::parse(" Radial "), Some(GradientKind::Radial));
    assert_eq!(GradientKind::parse("diamond"), None);
}

#[test]
fn deserializes_plain_tagged_and_unknown() {
    let f: FillSpec = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(f, FillSpec::solid(c("#ff0000")));

    let f: FillSpec =
        serde_json::from_value(json!({"kind": "linear", "from": "#000000", "to": "#4f46e5"}))
            .unwrap();
    assert_eq!(f, FillSpec::linear(c("#000000"), c("#4f46e5")));

    let f: FillSpec =
        serde_json::from_value(json!({"kind": "spiral", "from": "#abcdef", "to": "#000000"}))
            .unwrap();
    assert_eq!(f, FillSpec::solid(c("#abcdef")));

    assert!(serde_json::from_value::<FillSpec>(json!({"kind": "solid"})).is_err());
}

#[test]
fn serialized_form_reads_back() {
    for fill in [
        FillSpec::solid(c("#010203")),
        FillSpec::linear(c("#000"), c("#fff")),
        FillSpec::radial(c("#000"), c("#fff")),
    ] {
        let v = serde_json::to_value(&fill).unwrap();
        let back: FillSpec = serde_json::from_value(v).unwrap();
        assert_eq!(back, fill);
    }
}
