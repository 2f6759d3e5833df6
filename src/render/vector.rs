use std::fmt::Write as _;

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::render::logo::DecodedLogo;
use crate::render::raster::{MAX_DEVICE_PIXEL_RATIO, RasterImage};
use crate::render::surface::DrawSurface;
use crate::style::color::Color;
use crate::style::fill::Paint;

/// A complete, self-contained SVG document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorDocument {
    size_px: u32,
    markup: String,
}

impl VectorDocument {
    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn into_string(self) -> String {
        self.markup
    }

    /// Render the document with `resvg` at `scale` device pixels per symbol pixel.
    pub fn rasterize(&self, scale: f64) -> QrStyleResult<RasterImage> {
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_DEVICE_PIXEL_RATIO {
            return Err(QrStyleError::validation(format!(
                "rasterize scale must be within (0, {MAX_DEVICE_PIXEL_RATIO}], got {scale}"
            )));
        }
        let tree = usvg::Tree::from_str(&self.markup, &usvg::Options::default())
            .map_err(|e| QrStyleError::render(format!("parse vector document: {e}")))?;

        let side = (f64::from(self.size_px) * scale).round().max(1.0) as u32;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(side, side)
            .ok_or_else(|| QrStyleError::render("failed to allocate preview pixmap"))?;
        let s = side as f32 / self.size_px as f32;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(s, s),
            &mut pixmap.as_mut(),
        );

        Ok(RasterImage {
            width: side,
            height: side,
            data: pixmap.data().to_vec(),
            premultiplied: true,
        })
    }
}

impl std::fmt::Display for VectorDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.markup)
    }
}

/// Vector backend: accumulates SVG elements in draw order.
///
/// Gradients become `<defs>` entries referenced by id; a paint seen twice reuses its definition.
#[derive(Debug)]
pub struct VectorSurface {
    size_px: u32,
    defs: String,
    body: String,
    gradients: Vec<(Paint, String)>,
}

impl VectorSurface {
    pub fn new(size_px: u32) -> Self {
        Self {
            size_px,
            defs: String::new(),
            body: String::new(),
            gradients: Vec::new(),
        }
    }

    pub fn finish(self) -> VectorDocument {
        let size = self.size_px;
        let mut markup = String::with_capacity(self.defs.len() + self.body.len() + 256);
        markup.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink""#);
        markup.push_str(&format!(
            r#" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        ));
        markup.push_str("<defs>");
        markup.push_str(&self.defs);
        markup.push_str("</defs>");
        markup.push_str(&self.body);
        markup.push_str("</svg>");
        VectorDocument {
            size_px: size,
            markup,
        }
    }

    /// `fill="..."` attributes for `paint`, defining a gradient on first use.
    fn fill_attrs(&mut self, paint: &Paint) -> QrStyleResult<String> {
        let stops = match paint {
            Paint::Solid(c) => return Ok(color_attrs(c, "fill")),
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops,
        };
        if let Some((_, id)) = self.gradients.iter().find(|(p, _)| p == paint) {
            return Ok(format!(r#"fill="url(#{id})""#));
        }

        let id = format!("qr-fill-{}", self.gradients.len());
        match paint {
            Paint::Linear { start, end, .. } => write!(
                self.defs,
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                fmt_num(start.x),
                fmt_num(start.y),
                fmt_num(end.x),
                fmt_num(end.y),
            )?,
            // Percentages resolve against the viewport, so every module shares one gradient.
            _ => write!(
                self.defs,
                r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="50%" cy="50%" r="50%">"#
            )?,
        }
        for (offset, color) in ["0%", "100%"].iter().zip(stops.iter()) {
            write!(
                self.defs,
                r#"<stop offset="{offset}" {}/>"#,
                color_attrs(color, "stop-color")
            )?;
        }
        self.defs.push_str(match paint {
            Paint::Linear { .. } => "</linearGradient>",
            _ => "</radialGradient>",
        });

        self.gradients.push((paint.clone(), id.clone()));
        Ok(format!(r#"fill="url(#{id})""#))
    }
}

impl DrawSurface for VectorSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> QrStyleResult<()> {
        let fill = self.fill_attrs(paint)?;
        write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" {fill}/>"#,
            fmt_num(rect.x0),
            fmt_num(rect.y0),
            fmt_num(rect.width()),
            fmt_num(rect.height()),
        )?;
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint) -> QrStyleResult<()> {
        let fill = self.fill_attrs(paint)?;
        let r = fmt_num(radius);
        write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" {fill}/>"#,
            fmt_num(rect.x0),
            fmt_num(rect.y0),
            fmt_num(rect.width()),
            fmt_num(rect.height()),
        )?;
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) -> QrStyleResult<()> {
        let fill = self.fill_attrs(paint)?;
        write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" {fill}/>"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(radius),
        )?;
        Ok(())
    }

    fn draw_image(&mut self, rect: Rect, logo: &DecodedLogo) -> QrStyleResult<()> {
        write!(
            self.body,
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"/>"#,
            fmt_num(rect.x0),
            fmt_num(rect.y0),
            fmt_num(rect.width()),
            fmt_num(rect.height()),
            xml_escape(&logo.data_uri()),
        )?;
        Ok(())
    }
}

/// Color attribute pair; translucent colors split into an opaque color plus `*-opacity`.
fn color_attrs(color: &Color, attr: &str) -> String {
    if color.is_opaque() {
        return format!(r#"{attr}="{}""#, xml_escape(color.as_str()));
    }
    let [r, g, b, a] = color.to_rgba8();
    let opacity_attr = match attr {
        "stop-color" => "stop-opacity",
        _ => "fill-opacity",
    };
    format!(
        r##"{attr}="#{r:02x}{g:02x}{b:02x}" {opacity_attr}="{}""##,
        fmt_num(f64::from(a) / 255.0)
    )
}

/// Up to three decimals, trailing zeros trimmed.
pub(crate) fn fmt_num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_owned()
    } else {
        s.to_owned()
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/vector.rs"]
mod tests;
