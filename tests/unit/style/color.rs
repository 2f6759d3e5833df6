use super::*;
use serde_json::json;

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(Color::parse("#fff").unwrap().to_rgba8(), [255, 255, 255, 255]);
    assert_eq!(Color::parse("#4f46e5").unwrap().to_rgba8(), [0x4f, 0x46, 0xe5, 255]);
    assert_eq!(Color::parse("#0000ff80").unwrap().to_rgba8(), [0, 0, 255, 128]);
    assert_eq!(Color::parse("#f008").unwrap().to_rgba8(), [255, 0, 0, 0x88]);
}

#[test]
fn keeps_original_text_for_pass_through() {
    let c = Color::parse("  #4F46E5 ").unwrap();
    assert_eq!(c.as_str(), "#4F46E5");
    assert_eq!(c.to_string(), "#4F46E5");
}

#[test]
fn rejects_malformed_colors() {
    assert!(Color::parse("4f46e5").is_err());
    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("#zzzzzz").is_err());
    assert!(Color::parse("").is_err());
}

#[test]
fn deserializes_hex_and_array() {
    let c: Color = serde_json::from_value(json!("#000000")).unwrap();
    assert_eq!(c, Color::black());

    let c: Color = serde_json::from_value(json!([255, 255, 255])).unwrap();
    assert_eq!(c, Color::white());

    let c: Color = serde_json::from_value(json!([0, 0, 0, 0])).unwrap();
    assert_eq!(c.as_str(), "#00000000");
    assert!(!c.is_opaque());

    assert!(serde_json::from_value::<Color>(json!([1, 2])).is_err());
}

#[test]
fn serializes_as_original_text() {
    let c = Color::parse("#ABC").unwrap();
    assert_eq!(serde_json::to_value(&c).unwrap(), json!("#ABC"));
}
