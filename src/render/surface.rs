use crate::foundation::core::{Point, Rect};
use crate::foundation::error::QrStyleResult;
use crate::render::logo::DecodedLogo;
use crate::style::fill::Paint;

/// Drawing primitives a backend must provide to render a symbol.
///
/// All coordinates are in unscaled symbol pixels (`0..size_px`). Backends that target a denser
/// pixel grid apply their own device scale.
pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> QrStyleResult<()>;

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> QrStyleResult<()>;

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) -> QrStyleResult<()>;

    /// Draw `logo` stretched to fill `rect`.
    fn draw_image(&mut self, rect: Rect, logo: &DecodedLogo) -> QrStyleResult<()>;

    /// Device pixels per symbol pixel; used to pick a decode size for vector logos.
    fn device_scale(&self) -> f64 {
        1.0
    }
}
