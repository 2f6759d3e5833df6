use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::render::logo::Logo;
use crate::style::color::Color;
use crate::style::fill::FillSpec;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Smallest accepted output side length.
pub const MIN_SIZE_PX: u32 = 128;
/// Largest accepted output side length.
pub const MAX_SIZE_PX: u32 = 1024;
/// Widest accepted quiet zone, in modules.
pub const MAX_MARGIN_MODULES: u32 = 10;

/// Primitive used for every dark module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleShape {
    #[default]
    Square,
    Rounded,
    Dots,
}

/// Error-correction level the matrix was encoded with.
///
/// Carried for the caller's benefit only; rendering never reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrection {
    #[serde(alias = "low")]
    L,
    #[default]
    #[serde(alias = "medium")]
    M,
    #[serde(alias = "quartile")]
    Q,
    #[serde(alias = "high")]
    H,
}

impl ErrorCorrection {
    /// Approximate share of codewords that can be restored.
    pub fn recovery_percent(self) -> u8 {
        match self {
            Self::L => 7,
            Self::M => 15,
            Self::Q => 25,
            Self::H => 30,
        }
    }
}

/// Styling for one render pass.
///
/// JSON configs may omit any field; missing fields take the defaults (300 px, 2-module margin,
/// black squares on white, level M). The logo is never read from JSON and must be attached with
/// [`SymbolConfig::with_logo`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymbolConfig {
    /// Final square side length in output pixels.
    pub size_px: u32,
    /// Quiet-zone width in modules.
    pub margin_modules: u32,
    pub shape: ModuleShape,
    pub fill: FillSpec,
    pub background: Color,
    #[serde(skip)]
    pub logo: Option<Logo>,
    pub error_correction: ErrorCorrection,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            size_px: 300,
            margin_modules: 2,
            shape: ModuleShape::Square,
            fill: FillSpec::default(),
            background: Color::white(),
            logo: None,
            error_correction: ErrorCorrection::M,
        }
    }
}

impl SymbolConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> QrStyleResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| QrStyleError::serde(format!("parse symbol config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> QrStyleResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            QrStyleError::validation(format!("open symbol config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn with_logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Check the configuration against the accepted option ranges.
    pub fn validate(&self) -> QrStyleResult<()> {
        if !(MIN_SIZE_PX..=MAX_SIZE_PX).contains(&self.size_px) {
            return Err(QrStyleError::validation(format!(
                "size_px must be within {MIN_SIZE_PX}..={MAX_SIZE_PX}, got {}",
                self.size_px
            )));
        }
        if self.margin_modules > MAX_MARGIN_MODULES {
            return Err(QrStyleError::validation(format!(
                "margin_modules must be at most {MAX_MARGIN_MODULES}, got {}",
                self.margin_modules
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/config.rs"]
mod tests;
