use super::*;
use serde_json::json;

#[test]
fn new_rejects_wrong_module_count() {
    assert!(ModuleMatrix::new(3, vec![true; 8]).is_err());
    assert!(ModuleMatrix::new(3, vec![true; 9]).is_ok());
}

#[test]
fn from_rows_is_row_major() {
    let m = ModuleMatrix::from_rows(&["#..", "...", "..#"]).unwrap();
    assert_eq!(m.size(), 3);
    assert!(m.is_dark(0, 0));
    assert!(!m.is_dark(0, 1));
    assert!(m.is_dark(2, 2));
    assert!(m.modules()[8]);
    assert_eq!(m.dark_count(), 2);
}

#[test]
fn from_rows_rejects_ragged_rows() {
    let err = ModuleMatrix::from_rows(&["#.", "#"]).unwrap_err();
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn out_of_range_modules_are_light() {
    let m = ModuleMatrix::from_rows(&["##", "##"]).unwrap();
    assert!(!m.is_dark(2, 0));
    assert!(!m.is_dark(0, 5));
}

#[test]
fn empty_matrix_has_no_modules() {
    let m = ModuleMatrix::empty();
    assert!(m.is_empty());
    assert_eq!(m.dark_count(), 0);
}

#[test]
fn deserializes_flat_and_row_forms() {
    let flat: ModuleMatrix =
        serde_json::from_value(json!({"size": 2, "modules": [true, false, false, true]})).unwrap();
    let rows: ModuleMatrix = serde_json::from_value(json!(["#.", ".#"])).unwrap();
    assert_eq!(flat, rows);

    let bad = serde_json::from_value::<ModuleMatrix>(json!({"size": 2, "modules": [true]}));
    assert!(bad.is_err());
}
