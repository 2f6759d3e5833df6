use crate::foundation::error::{QrStyleError, QrStyleResult};
use serde::{Deserialize, Serialize};

/// Square grid of QR modules as produced by an encoder.
///
/// Modules are stored row-major; `true` marks a dark module. The matrix is immutable once built
/// and a side length of zero is a valid, empty symbol ("nothing to render").
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Build a matrix from a row-major module sequence of length `size * size`.
    pub fn new(size: usize, modules: Vec<bool>) -> QrStyleResult<Self> {
        let expected = size
            .checked_mul(size)
            .ok_or_else(|| QrStyleError::validation("module matrix side length overflows"))?;
        if modules.len() != expected {
            return Err(QrStyleError::validation(format!(
                "module matrix of side {size} needs {expected} modules, got {}",
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    /// Build a matrix from rows, e.g. `["#.#", "...", "#.#"]`, where `#` is dark.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> QrStyleResult<Self> {
        let size = rows.len();
        let mut modules = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != size {
                return Err(QrStyleError::validation(format!(
                    "row {r} has {} modules, expected {size}",
                    row.chars().count()
                )));
            }
            modules.extend(row.chars().map(|c| c == '#'));
        }
        Self::new(size, modules)
    }

    pub fn empty() -> Self {
        Self {
            size: 0,
            modules: Vec::new(),
        }
    }

    /// Side length in modules (`N`).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Whether the module at `(row, col)` is dark. Out-of-range positions are light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        self.modules[row * self.size + col]
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}

impl<'de> Deserialize<'de> for ModuleMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flat { size: usize, modules: Vec<bool> },
            Rows(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flat { size, modules } => {
                Self::new(size, modules).map_err(serde::de::Error::custom)
            }
            Repr::Rows(rows) => Self::from_rows(&rows).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/matrix.rs"]
mod tests;
