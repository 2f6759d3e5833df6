use crate::foundation::core::Rect;
use crate::foundation::error::{QrStyleError, QrStyleResult};

/// Per-module placement shared by every backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Side length of one module in output pixels.
    pub scale: f64,
    /// Distance from the symbol edge to the first module (the quiet zone), in pixels.
    pub offset: f64,
    module_count: usize,
}

impl Geometry {
    /// `scale = size / (N + 2*margin)`, `offset = margin * scale`.
    pub fn compute(module_count: usize, size_px: u32, margin_modules: u32) -> QrStyleResult<Self> {
        if module_count == 0 {
            return Err(QrStyleError::validation("module count must be >= 1"));
        }
        if size_px == 0 {
            return Err(QrStyleError::validation("size_px must be > 0"));
        }
        let span = module_count as f64 + 2.0 * f64::from(margin_modules);
        let scale = f64::from(size_px) / span;
        let offset = f64::from(margin_modules) * scale;
        tracing::debug!(module_count, size_px, margin_modules, scale, offset, "geometry");
        Ok(Self {
            scale,
            offset,
            module_count,
        })
    }

    pub fn module_count(&self) -> usize {
        self.module_count
    }

    /// Bounding box of the module at `(row, col)`.
    pub fn module_rect(&self, row: usize, col: usize) -> Rect {
        let x = self.offset + col as f64 * self.scale;
        let y = self.offset + row as f64 * self.scale;
        Rect::new(x, y, x + self.scale, y + self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
