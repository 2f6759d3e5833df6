use std::io::Cursor;

use super::*;
use crate::foundation::core::Point;
use crate::render::logo::{DecodedLogo, Logo};
use crate::style::color::Color;
use crate::style::fill::FillSpec;
use crate::symbol::config::ModuleShape;

#[derive(Debug, PartialEq)]
enum Call {
    Rect(Rect),
    Rounded(Rect),
    Circle(Point),
    Image(Rect),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl DrawSurface for Recorder {
    fn fill_rect(&mut self, rect: Rect, _paint: &Paint) -> QrStyleResult<()> {
        self.calls.push(Call::Rect(rect));
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, _radius: f64, _paint: &Paint) -> QrStyleResult<()> {
        self.calls.push(Call::Rounded(rect));
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, _radius: f64, _paint: &Paint) -> QrStyleResult<()> {
        self.calls.push(Call::Circle(center));
        Ok(())
    }

    fn draw_image(&mut self, rect: Rect, _logo: &DecodedLogo) -> QrStyleResult<()> {
        self.calls.push(Call::Image(rect));
        Ok(())
    }
}

fn full(n: usize) -> ModuleMatrix {
    ModuleMatrix::new(n, vec![true; n * n]).unwrap()
}

fn png_logo() -> Logo {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    Logo::from_bytes(buf)
}

#[test]
fn background_comes_first_then_modules() {
    let m = ModuleMatrix::from_rows(&["#.", ".#"]).unwrap();
    let cfg = SymbolConfig {
        size_px: 200,
        margin_modules: 0,
        ..SymbolConfig::default()
    };
    let mut rec = Recorder::default();
    let stats = paint_symbol(&mut rec, &m, &cfg).unwrap();
    assert_eq!(
        rec.calls,
        vec![
            Call::Rect(Rect::new(0.0, 0.0, 200.0, 200.0)),
            Call::Rect(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Call::Rect(Rect::new(100.0, 100.0, 200.0, 200.0)),
        ]
    );
    assert_eq!(
        stats,
        SymbolStats {
            modules_drawn: 2,
            modules_excluded: 0,
            logo_drawn: false
        }
    );
}

#[test]
fn shape_selects_primitive() {
    let cfg = SymbolConfig {
        shape: ModuleShape::Dots,
        ..SymbolConfig::default()
    };
    let mut rec = Recorder::default();
    paint_symbol(&mut rec, &full(3), &cfg).unwrap();
    assert!(matches!(rec.calls[0], Call::Rect(_)));
    assert_eq!(rec.calls[1..].len(), 9);
    assert!(rec.calls[1..].iter().all(|c| matches!(c, Call::Circle(_))));
}

#[test]
fn logo_overlay_is_drawn_last() {
    let cfg = SymbolConfig {
        size_px: 400,
        margin_modules: 4,
        ..SymbolConfig::default()
    }
    .with_logo(png_logo());
    let mut rec = Recorder::default();
    let stats = paint_symbol(&mut rec, &full(29), &cfg).unwrap();

    assert!(stats.logo_drawn);
    assert!(stats.modules_excluded > 0);
    assert_eq!(stats.modules_drawn + stats.modules_excluded, 29 * 29);

    let n = rec.calls.len();
    assert_eq!(rec.calls[n - 2], Call::Rounded(Rect::new(155.0, 155.0, 245.0, 245.0)));
    assert_eq!(rec.calls[n - 1], Call::Image(Rect::new(160.0, 160.0, 240.0, 240.0)));
    assert_eq!(n, 1 + stats.modules_drawn + 2);
}

#[test]
fn broken_logo_still_reserves_region() {
    let cfg = SymbolConfig {
        size_px: 400,
        ..SymbolConfig::default()
    }
    .with_logo(Logo::from_bytes(b"definitely not an image".to_vec()));
    let mut rec = Recorder::default();
    let stats = paint_symbol(&mut rec, &full(25), &cfg).unwrap();
    assert!(!stats.logo_drawn);
    assert!(stats.modules_excluded > 0);
    assert!(matches!(rec.calls.last(), Some(Call::Rounded(_))));
}

#[test]
fn empty_matrix_exports_nothing() {
    let cfg = SymbolConfig::default();
    assert!(
        export_raster(&ModuleMatrix::empty(), &cfg, RasterOpts::default())
            .unwrap()
            .is_none()
    );
    assert!(export_vector(&ModuleMatrix::empty(), &cfg).unwrap().is_none());
}

#[test]
fn invalid_config_is_rejected_before_rendering() {
    let cfg = SymbolConfig {
        size_px: 64,
        ..SymbolConfig::default()
    };
    let err = export_vector(&full(21), &cfg).unwrap_err();
    assert!(matches!(err, crate::foundation::error::QrStyleError::Validation(_)));
}

#[test]
fn raster_export_honors_device_pixel_ratio() {
    let cfg = SymbolConfig {
        size_px: 150,
        ..SymbolConfig::default()
    };
    let img = export_raster(
        &full(21),
        &cfg,
        RasterOpts {
            device_pixel_ratio: 2.0,
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!((img.width, img.height), (300, 300));
}

#[test]
fn vector_export_carries_gradient_fill() {
    let cfg = SymbolConfig {
        fill: FillSpec::linear(Color::black(), Color::parse("#4f46e5").unwrap()),
        ..SymbolConfig::default()
    };
    let doc = export_vector(&full(21), &cfg).unwrap().unwrap();
    let svg = doc.as_str();
    assert_eq!(svg.matches("<linearGradient").count(), 1);
    // Background stays solid; every module references the gradient.
    assert_eq!(svg.matches(r#"fill="url(#qr-fill-0)""#).count(), 21 * 21);
}
