use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Affine, Point, Rect, unpremultiply_rgba8_in_place};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::render::logo::DecodedLogo;
use crate::render::surface::DrawSurface;
use crate::style::color::Color;
use crate::style::fill::Paint;

/// Highest accepted device pixel ratio.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 8.0;

const PATH_TOLERANCE: f64 = 0.01;

/// A rendered symbol as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl RasterImage {
    /// Straight-alpha RGBA at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px: [u8; 4] = self.data.get(i..i + 4)?.try_into().ok()?;
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut px);
        }
        Some(px)
    }

    /// Convert to a straight-alpha `image` buffer.
    pub fn to_rgba_image(&self) -> QrStyleResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| QrStyleError::render("raster byte length does not match dimensions"))
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> QrStyleResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }

    /// Share of pixels whose straight RGBA differs from `other` by more than `tolerance` in any
    /// channel.
    pub fn mismatch_ratio(&self, other: &RasterImage, tolerance: u8) -> QrStyleResult<f64> {
        if self.width != other.width || self.height != other.height {
            return Err(QrStyleError::validation(format!(
                "cannot compare {}x{} with {}x{}",
                self.width, self.height, other.width, other.height
            )));
        }
        let total = u64::from(self.width) * u64::from(self.height);
        if total == 0 {
            return Ok(0.0);
        }
        let mut differing = 0u64;
        for y in 0..self.height {
            for x in 0..self.width {
                let (Some(a), Some(b)) = (self.pixel(x, y), other.pixel(x, y)) else {
                    continue;
                };
                if a.iter().zip(b.iter()).any(|(&p, &q)| p.abs_diff(q) > tolerance) {
                    differing += 1;
                }
            }
        }
        Ok(differing as f64 / total as f64)
    }
}

/// Raster backend powered by `vello_cpu`.
///
/// The surface is `size_px * dpr` pixels square; callers draw in symbol pixels and the device
/// scale is applied as the base transform.
pub struct RasterSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    base: Affine,
    device_scale: f64,
}

impl RasterSurface {
    pub fn new(size_px: u32, device_pixel_ratio: f64) -> QrStyleResult<Self> {
        if !device_pixel_ratio.is_finite()
            || device_pixel_ratio <= 0.0
            || device_pixel_ratio > MAX_DEVICE_PIXEL_RATIO
        {
            return Err(QrStyleError::validation(format!(
                "device pixel ratio must be within (0, {MAX_DEVICE_PIXEL_RATIO}], got {device_pixel_ratio}"
            )));
        }
        if size_px == 0 {
            return Err(QrStyleError::validation("size_px must be > 0"));
        }
        let side = (f64::from(size_px) * device_pixel_ratio).round().max(1.0);
        let side: u16 = (side as u32)
            .try_into()
            .map_err(|_| QrStyleError::validation("raster surface exceeds u16 pixels"))?;

        // Snap the scale so the symbol exactly covers the integer pixel grid.
        let device_scale = f64::from(side) / f64::from(size_px);
        let base = Affine::scale(device_scale);
        let ctx = vello_cpu::RenderContext::new(side, side);
        Ok(Self {
            ctx,
            width: side,
            height: side,
            base,
            device_scale,
        })
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> RasterImage {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        RasterImage {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn prepare(&mut self, transform: Affine, paint: &Paint) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        set_cpu_paint(&mut self.ctx, paint);
    }

    fn fill_shape(&mut self, shape: &impl kurbo::Shape, paint: &Paint) {
        self.prepare(self.base, paint);
        let path = bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE));
        self.ctx.fill_path(&path);
    }
}

impl DrawSurface for RasterSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> QrStyleResult<()> {
        self.prepare(self.base, paint);
        self.ctx.fill_rect(&rect_to_cpu(rect));
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> QrStyleResult<()> {
        self.fill_shape(&kurbo::RoundedRect::from_rect(rect, radius), paint);
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) -> QrStyleResult<()> {
        self.fill_shape(&kurbo::Circle::new(center, radius), paint);
        Ok(())
    }

    fn draw_image(&mut self, rect: Rect, logo: &DecodedLogo) -> QrStyleResult<()> {
        let pixmap = pixmap_from_premul_bytes(&logo.rgba8_premul, logo.width, logo.height)?;
        let image = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let w = f64::from(logo.width);
        let h = f64::from(logo.height);
        let transform = self.base
            * Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(rect.width() / w, rect.height() / h);

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(image);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    }

    fn device_scale(&self) -> f64 {
        self.device_scale
    }
}

fn cpu_color(c: &Color) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn set_cpu_paint(ctx: &mut vello_cpu::RenderContext, paint: &Paint) {
    match paint {
        Paint::Solid(c) => ctx.set_paint(cpu_color(c)),
        Paint::Linear { start, end, stops } => {
            let gradient =
                vello_cpu::peniko::Gradient::new_linear(cpu_point(*start), cpu_point(*end))
                    .with_stops([cpu_color(&stops[0]), cpu_color(&stops[1])]);
            ctx.set_paint(gradient);
        }
        Paint::Radial {
            center,
            inner_radius,
            outer_radius,
            stops,
        } => {
            let gradient = vello_cpu::peniko::Gradient::new_two_point_radial(
                cpu_point(*center),
                *inner_radius as f32,
                cpu_point(*center),
                *outer_radius as f32,
            )
            .with_stops([cpu_color(&stops[0]), cpu_color(&stops[1])]);
            ctx.set_paint(gradient);
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(cpu_point(p1), cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(cpu_point(p1), cpu_point(p2), cpu_point(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> QrStyleResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| QrStyleError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| QrStyleError::render("pixmap height exceeds u16"))?;
    if bytes.len() != width as usize * height as usize * 4 {
        return Err(QrStyleError::render("pixmap byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
