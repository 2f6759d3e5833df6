use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::core::{Rect, premultiply_rgba8_in_place};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::render::surface::DrawSurface;
use crate::style::color::Color;
use crate::style::fill::Paint;

/// Logo side length relative to the symbol side.
pub const LOGO_SIZE_RATIO: f64 = 0.2;
/// Background halo around the logo, in symbol pixels.
pub const LOGO_PAD_PX: f64 = 5.0;
/// Corner radius of the background halo, in symbol pixels.
pub const LOGO_PAD_RADIUS_PX: f64 = 5.0;

const MAX_LOGO_DIM: u32 = 4096;

/// Encoded logo image bytes as supplied by the user (PNG, JPEG, SVG, ...).
#[derive(Clone, PartialEq, Eq)]
pub struct Logo {
    bytes: Arc<[u8]>,
}

impl Logo {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> QrStyleResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read logo '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the logo into premultiplied RGBA8.
    ///
    /// Raster formats decode at their intrinsic size. SVG logos are rasterized into a
    /// `target_px` square, matching how the logo is stretched into its region.
    pub fn decode(&self, target_px: u32) -> QrStyleResult<DecodedLogo> {
        if looks_like_svg(&self.bytes) {
            self.decode_svg(target_px)
        } else {
            self.decode_raster()
        }
    }

    fn decode_raster(&self) -> QrStyleResult<DecodedLogo> {
        let format = image::guess_format(&self.bytes)
            .map_err(|e| QrStyleError::decode(format!("unrecognized logo format: {e}")))?;
        let dyn_img = image::load_from_memory_with_format(&self.bytes, format)
            .map_err(|e| QrStyleError::decode(format!("decode logo image: {e}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(QrStyleError::decode("logo image has zero size"));
        }
        if width > MAX_LOGO_DIM || height > MAX_LOGO_DIM {
            return Err(QrStyleError::decode(format!(
                "logo image {width}x{height} exceeds {MAX_LOGO_DIM}px"
            )));
        }

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        Ok(DecodedLogo {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            mime: format.to_mime_type(),
            source: self.bytes.clone(),
        })
    }

    fn decode_svg(&self, target_px: u32) -> QrStyleResult<DecodedLogo> {
        let side = target_px.clamp(1, MAX_LOGO_DIM);
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(&self.bytes, &opts)
            .map_err(|e| QrStyleError::decode(format!("parse svg logo: {e}")))?;

        let size = tree.size();
        if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(QrStyleError::decode("svg logo has invalid width/height"));
        }
        let mut pixmap = resvg::tiny_skia::Pixmap::new(side, side)
            .ok_or_else(|| QrStyleError::decode("failed to allocate svg logo pixmap"))?;
        let xform = resvg::tiny_skia::Transform::from_scale(
            side as f32 / size.width(),
            side as f32 / size.height(),
        );
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        Ok(DecodedLogo {
            width: side,
            height: side,
            rgba8_premul: Arc::new(pixmap.data().to_vec()),
            mime: "image/svg+xml",
            source: self.bytes.clone(),
        })
    }
}

impl fmt::Debug for Logo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logo")
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    // The cut may split a multi-byte character; sniff the valid prefix.
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with('<') && text.contains("<svg"))
}

/// A logo ready to draw: decoded pixels for raster output plus the original bytes for vector
/// embedding.
#[derive(Clone)]
pub struct DecodedLogo {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
    pub mime: &'static str,
    pub(crate) source: Arc<[u8]>,
}

impl DecodedLogo {
    /// Self-contained `data:` URI of the original logo bytes.
    pub fn data_uri(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.source);
        format!("data:{};base64,{b64}", self.mime)
    }
}

impl fmt::Debug for DecodedLogo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedLogo")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mime", &self.mime)
            .finish()
    }
}

/// Centered square reserved for the logo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoRegion {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl LogoRegion {
    pub fn centered(symbol_size_px: f64) -> Self {
        let size = symbol_size_px * LOGO_SIZE_RATIO;
        let origin = (symbol_size_px - size) / 2.0;
        Self {
            x: origin,
            y: origin,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.size, self.y + self.size)
    }

    /// The region grown by the background halo.
    pub fn padded_rect(&self) -> Rect {
        self.rect().inflate(LOGO_PAD_PX, LOGO_PAD_PX)
    }

    /// Strict box intersection; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, cell: Rect) -> bool {
        overlaps(cell, self.rect())
    }
}

/// Whether two axis-aligned boxes share interior area.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x1 > b.x0 && a.x0 < b.x1 && a.y1 > b.y0 && a.y0 < b.y1
}

/// Draw the logo overlay: a background pad over the padded region, then the logo stretched into
/// the region.
///
/// Runs after all modules are drawn. A logo that fails to decode leaves the padded region blank
/// and returns `Ok(false)`.
pub fn composite_logo<S: DrawSurface + ?Sized>(
    surface: &mut S,
    region: &LogoRegion,
    logo: &Logo,
    background: &Color,
) -> QrStyleResult<bool> {
    surface.fill_rounded_rect(
        region.padded_rect(),
        LOGO_PAD_RADIUS_PX,
        &Paint::Solid(background.clone()),
    )?;

    let target_px = (region.size * surface.device_scale()).ceil().max(1.0) as u32;
    match logo.decode(target_px) {
        Ok(decoded) => {
            surface.draw_image(region.rect(), &decoded)?;
            Ok(true)
        }
        Err(err) => {
            tracing::warn!(error = %err, "logo could not be decoded, leaving its region blank");
            Ok(false)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/logo.rs"]
mod tests;
