//! Drawing: geometry, the shared module iteration, logo overlay, and the two backends.
//!
//! Every backend implements [`surface::DrawSurface`]; [`shapes::draw_modules`] and
//! [`logo::composite_logo`] are the only callers that emit primitives, so raster and vector output
//! receive identical calls in identical order.

/// Pixel geometry shared by both backends.
pub mod geometry;
/// Centered logo region, exclusion predicate, and overlay compositing.
pub mod logo;
/// `vello_cpu` raster backend.
pub mod raster;
/// Module layout and per-shape primitives.
pub mod shapes;
/// Drawing-primitive trait implemented by each backend.
pub mod surface;
/// SVG markup backend.
pub mod vector;
