use crate::foundation::core::Rect;
use crate::foundation::error::QrStyleResult;
use crate::render::geometry::Geometry;
use crate::render::logo::{LogoRegion, composite_logo};
use crate::render::raster::{RasterImage, RasterSurface};
use crate::render::shapes::{draw_modules, layout_modules};
use crate::render::surface::DrawSurface;
use crate::render::vector::{VectorDocument, VectorSurface};
use crate::style::fill::{Paint, resolve_paint};
use crate::symbol::config::SymbolConfig;
use crate::symbol::matrix::ModuleMatrix;

/// Counters from one pass over a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolStats {
    /// Dark modules emitted as primitives.
    pub modules_drawn: usize,
    /// Dark modules suppressed because they overlap the logo region.
    pub modules_excluded: usize,
    /// Whether the logo image itself was drawn (false when absent or undecodable).
    pub logo_drawn: bool,
}

/// Options for raster export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOpts {
    /// Device pixels per symbol pixel.
    pub device_pixel_ratio: f64,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
        }
    }
}

/// Draw the whole symbol onto `surface`: background, dark modules, then the logo overlay.
///
/// `matrix` must be non-empty; callers filter the empty case first.
pub fn paint_symbol<S: DrawSurface + ?Sized>(
    surface: &mut S,
    matrix: &ModuleMatrix,
    config: &SymbolConfig,
) -> QrStyleResult<SymbolStats> {
    let size = f64::from(config.size_px);
    let geometry = Geometry::compute(matrix.size(), config.size_px, config.margin_modules)?;

    surface.fill_rect(
        Rect::new(0.0, 0.0, size, size),
        &Paint::Solid(config.background.clone()),
    )?;

    let paint = resolve_paint(&config.fill, size);
    let region = config.logo.as_ref().map(|_| LogoRegion::centered(size));
    let layout = layout_modules(matrix, &geometry, region.as_ref());
    let modules_drawn = draw_modules(surface, &layout, config.shape, &paint)?;

    let logo_drawn = match (&config.logo, &region) {
        (Some(logo), Some(region)) => {
            composite_logo(surface, region, logo, &config.background)?
        }
        _ => false,
    };

    tracing::debug!(
        modules_drawn,
        modules_excluded = layout.excluded,
        logo_drawn,
        "painted symbol"
    );
    Ok(SymbolStats {
        modules_drawn,
        modules_excluded: layout.excluded,
        logo_drawn,
    })
}

/// Render `matrix` to an RGBA bitmap of `size_px * dpr` square pixels.
///
/// Returns `Ok(None)` for an empty matrix.
#[tracing::instrument(skip(matrix, config), fields(n = matrix.size(), size_px = config.size_px))]
pub fn export_raster(
    matrix: &ModuleMatrix,
    config: &SymbolConfig,
    opts: RasterOpts,
) -> QrStyleResult<Option<RasterImage>> {
    config.validate()?;
    if matrix.is_empty() {
        tracing::debug!("nothing to render");
        return Ok(None);
    }
    let mut surface = RasterSurface::new(config.size_px, opts.device_pixel_ratio)?;
    paint_symbol(&mut surface, matrix, config)?;
    Ok(Some(surface.finish()))
}

/// Render `matrix` to a self-contained SVG document.
///
/// Returns `Ok(None)` for an empty matrix.
#[tracing::instrument(skip(matrix, config), fields(n = matrix.size(), size_px = config.size_px))]
pub fn export_vector(
    matrix: &ModuleMatrix,
    config: &SymbolConfig,
) -> QrStyleResult<Option<VectorDocument>> {
    config.validate()?;
    if matrix.is_empty() {
        tracing::debug!("nothing to render");
        return Ok(None);
    }
    let mut surface = VectorSurface::new(config.size_px);
    paint_symbol(&mut surface, matrix, config)?;
    Ok(Some(surface.finish()))
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
