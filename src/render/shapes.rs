use crate::foundation::core::{Point, Rect};
use crate::foundation::error::QrStyleResult;
use crate::render::geometry::Geometry;
use crate::render::logo::LogoRegion;
use crate::render::surface::DrawSurface;
use crate::style::fill::Paint;
use crate::symbol::config::ModuleShape;
use crate::symbol::matrix::ModuleMatrix;

/// Corner radius of a rounded module, relative to the module side.
pub const ROUNDED_CORNER_RATIO: f64 = 0.35;
/// Radius of a dot module, relative to the module side (85% of the half cell).
pub const DOT_RADIUS_RATIO: f64 = 0.425;

/// A dark module that survived logo exclusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModulePlacement {
    pub row: usize,
    pub col: usize,
    /// Cell bounding box in symbol pixels.
    pub rect: Rect,
}

/// Dark modules in row-major order, with the number suppressed by the logo region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleLayout {
    pub placements: Vec<ModulePlacement>,
    pub excluded: usize,
}

/// Walk the matrix row-major and place every dark module not covered by `exclusion`.
pub fn layout_modules(
    matrix: &ModuleMatrix,
    geometry: &Geometry,
    exclusion: Option<&LogoRegion>,
) -> ModuleLayout {
    let n = matrix.size();
    let mut out = ModuleLayout::default();
    for (i, &dark) in matrix.modules().iter().enumerate() {
        if !dark {
            continue;
        }
        let (row, col) = (i / n, i % n);
        let rect = geometry.module_rect(row, col);
        if exclusion.is_some_and(|region| region.overlaps(rect)) {
            out.excluded += 1;
            continue;
        }
        out.placements.push(ModulePlacement { row, col, rect });
    }
    out
}

/// The primitive emitted for one module.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModulePrimitive {
    Rect(Rect),
    RoundedRect { rect: Rect, radius: f64 },
    Circle { center: Point, radius: f64 },
}

impl ModulePrimitive {
    pub fn for_shape(shape: ModuleShape, cell: Rect) -> Self {
        let side = cell.width();
        match shape {
            ModuleShape::Square => Self::Rect(cell),
            ModuleShape::Rounded => Self::RoundedRect {
                rect: cell,
                radius: side * ROUNDED_CORNER_RATIO,
            },
            ModuleShape::Dots => Self::Circle {
                center: cell.center(),
                radius: side * DOT_RADIUS_RATIO,
            },
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            Self::Rect(rect) | Self::RoundedRect { rect, .. } => rect,
            Self::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
        }
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, paint: &Paint) -> QrStyleResult<()> {
        match *self {
            Self::Rect(rect) => surface.fill_rect(rect, paint),
            Self::RoundedRect { rect, radius } => surface.fill_rounded_rect(rect, radius, paint),
            Self::Circle { center, radius } => surface.fill_circle(center, radius, paint),
        }
    }
}

/// Emit one primitive per placement, in layout order. Returns the number drawn.
pub fn draw_modules<S: DrawSurface + ?Sized>(
    surface: &mut S,
    layout: &ModuleLayout,
    shape: ModuleShape,
    paint: &Paint,
) -> QrStyleResult<usize> {
    for placement in &layout.placements {
        ModulePrimitive::for_shape(shape, placement.rect).draw(surface, paint)?;
    }
    Ok(layout.placements.len())
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
