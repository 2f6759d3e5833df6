use crate::foundation::error::{QrStyleError, QrStyleResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user-supplied color.
///
/// The original text is kept verbatim so the vector backend can pass it through unchanged, while
/// the raster backend works from the parsed straight-alpha RGBA value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    text: String,
    rgba: [u8; 4],
}

impl Color {
    pub fn parse(s: &str) -> QrStyleResult<Self> {
        let text = s.trim();
        let rgba = parse_hex(text).map_err(QrStyleError::validation)?;
        Ok(Self {
            text: text.to_owned(),
            rgba,
        })
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let text = if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        };
        Self {
            text,
            rgba: [r, g, b, a],
        }
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// The color exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Straight (non-premultiplied) RGBA8.
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.rgba
    }

    pub fn is_opaque(&self) -> bool {
        self.rgba[3] == 255
    }
}

impl FromStr for Color {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                &[r, g, b] => Ok(Self::rgb(r, g, b)),
                &[r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<[u8; 4], String> {
    let Some(digits) = s.strip_prefix('#') else {
        return Err(format!("color \"{s}\" must start with '#'"));
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("color \"{s}\" contains non-hex digits"));
    }

    fn byte(pair: &str) -> u8 {
        // Callers have already checked the digits.
        u8::from_str_radix(pair, 16).unwrap_or(0)
    }
    fn nibble(c: &str) -> u8 {
        byte(c) * 17
    }

    match digits.len() {
        3 => Ok([
            nibble(&digits[0..1]),
            nibble(&digits[1..2]),
            nibble(&digits[2..3]),
            255,
        ]),
        4 => Ok([
            nibble(&digits[0..1]),
            nibble(&digits[1..2]),
            nibble(&digits[2..3]),
            nibble(&digits[3..4]),
        ]),
        6 => Ok([
            byte(&digits[0..2]),
            byte(&digits[2..4]),
            byte(&digits[4..6]),
            255,
        ]),
        8 => Ok([
            byte(&digits[0..2]),
            byte(&digits[2..4]),
            byte(&digits[4..6]),
            byte(&digits[6..8]),
        ]),
        _ => Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
