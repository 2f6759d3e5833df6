use crate::foundation::core::Point;
use crate::style::color::Color;
use serde::{Deserialize, Serialize};

/// Gradient flavors supported by both backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

impl GradientKind {
    /// Parse a gradient kind name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" | "linear-gradient" => Some(Self::Linear),
            "radial" | "radial-gradient" => Some(Self::Radial),
            _ => None,
        }
    }
}

/// How dark modules are filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FillSpec {
    Solid {
        color: Color,
    },
    Gradient {
        gradient: GradientKind,
        from: Color,
        to: Color,
    },
}

impl FillSpec {
    pub fn solid(color: Color) -> Self {
        Self::Solid { color }
    }

    pub fn linear(from: Color, to: Color) -> Self {
        Self::Gradient {
            gradient: GradientKind::Linear,
            from,
            to,
        }
    }

    pub fn radial(from: Color, to: Color) -> Self {
        Self::Gradient {
            gradient: GradientKind::Radial,
            from,
            to,
        }
    }

    /// Build a fill from a kind name such as `solid`, `linear-gradient` or `radial-gradient`.
    ///
    /// Any other name, or a gradient without a second color, degrades to a solid fill with the
    /// primary color.
    pub fn from_parts(kind: &str, primary: Color, secondary: Option<Color>) -> Self {
        if kind.trim().eq_ignore_ascii_case("solid") {
            return Self::solid(primary);
        }
        match (GradientKind::parse(kind), secondary) {
            (Some(gradient), Some(to)) => Self::Gradient {
                gradient,
                from: primary,
                to,
            },
            (None, _) => {
                tracing::warn!(kind, "unsupported gradient kind, using solid fill");
                Self::solid(primary)
            }
            (Some(_), None) => {
                tracing::warn!(kind, "gradient is missing its second color, using solid fill");
                Self::solid(primary)
            }
        }
    }

    /// The first configured color (the solid color, or the gradient's start stop).
    pub fn primary(&self) -> &Color {
        match self {
            Self::Solid { color } => color,
            Self::Gradient { from, .. } => from,
        }
    }
}

impl Default for FillSpec {
    fn default() -> Self {
        Self::solid(Color::black())
    }
}

impl Serialize for FillSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;

        match self {
            Self::Solid { color } => {
                let mut st = serializer.serialize_struct("FillSpec", 2)?;
                st.serialize_field("kind", "solid")?;
                st.serialize_field("color", color)?;
                st.end()
            }
            Self::Gradient { gradient, from, to } => {
                let mut st = serializer.serialize_struct("FillSpec", 3)?;
                st.serialize_field("kind", gradient)?;
                st.serialize_field("from", from)?;
                st.serialize_field("to", to)?;
                st.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for FillSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(Color),
            Tagged {
                kind: String,
                #[serde(default)]
                color: Option<Color>,
                #[serde(default)]
                from: Option<Color>,
                #[serde(default)]
                to: Option<Color>,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Plain(color) => Ok(Self::solid(color)),
            Repr::Tagged {
                kind,
                color,
                from,
                to,
            } => {
                let primary = color.or(from).ok_or_else(|| {
                    serde::de::Error::custom("fill needs `color` (solid) or `from` (gradient)")
                })?;
                Ok(Self::from_parts(&kind, primary, to))
            }
        }
    }
}

/// A fill resolved against the symbol bounds, ready for a backend to translate.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Two-stop linear gradient from `start` to `end`.
    Linear {
        start: Point,
        end: Point,
        stops: [Color; 2],
    },
    /// Two-point radial gradient sharing one center.
    Radial {
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        stops: [Color; 2],
    },
}

/// Resolve a fill against a `size_px` square symbol.
///
/// Linear gradients run corner to corner, (0,0) to (size,size). Radial gradients are centered on
/// the symbol with inner radius `size/10` and outer radius `size/1.5`.
pub fn resolve_paint(fill: &FillSpec, size_px: f64) -> Paint {
    let paint = match fill {
        FillSpec::Solid { color } => Paint::Solid(color.clone()),
        FillSpec::Gradient {
            gradient: GradientKind::Linear,
            from,
            to,
        } => Paint::Linear {
            start: Point::ZERO,
            end: Point::new(size_px, size_px),
            stops: [from.clone(), to.clone()],
        },
        FillSpec::Gradient {
            gradient: GradientKind::Radial,
            from,
            to,
        } => Paint::Radial {
            center: Point::new(size_px / 2.0, size_px / 2.0),
            inner_radius: size_px / 10.0,
            outer_radius: size_px / 1.5,
            stops: [from.clone(), to.clone()],
        },
    };
    tracing::debug!(?paint, "resolved module paint");
    paint
}

#[cfg(test)]
#[path = "../../tests/unit/style/fill.rs"]
mod tests;
