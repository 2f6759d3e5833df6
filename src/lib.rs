//! qrstyle renders styled QR code symbols as PNG-ready bitmaps and self-contained SVG documents.
//!
//! The input is an already-encoded module matrix. Styling covers module shape, solid or gradient
//! fills, quiet-zone width and an optional centered logo. Both backends share one geometry and
//! module-iteration routine, so they place every module identically:
//!
//! - Build a [`ModuleMatrix`] and a [`SymbolConfig`]
//! - Call [`export_raster`] or [`export_vector`], or keep a [`RenderSession`] per backend
#![forbid(unsafe_code)]

mod foundation;

/// Export entry points and render sessions.
pub mod export;
/// Drawing surfaces, geometry, and logo overlay.
pub mod render;
/// Colors and fills.
pub mod style;
/// Module matrix and configuration.
pub mod symbol;

pub use crate::foundation::core::{Point, Rect};
pub use crate::foundation::error::{QrStyleError, QrStyleResult};

pub use crate::export::pipeline::{
    RasterOpts, SymbolStats, export_raster, export_vector, paint_symbol,
};
pub use crate::export::session::{
    Exporter, RasterExporter, RenderSession, RenderState, VectorExporter,
};
pub use crate::render::geometry::Geometry;
pub use crate::render::logo::{DecodedLogo, Logo, LogoRegion};
pub use crate::render::raster::{RasterImage, RasterSurface};
pub use crate::render::surface::DrawSurface;
pub use crate::render::vector::{VectorDocument, VectorSurface};
pub use crate::style::color::Color;
pub use crate::style::fill::{FillSpec, GradientKind, Paint};
pub use crate::symbol::config::{ErrorCorrection, ModuleShape, SymbolConfig};
pub use crate::symbol::matrix::ModuleMatrix;
