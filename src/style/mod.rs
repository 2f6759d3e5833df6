//! Fill styling: colors, fill descriptions, and their resolution into backend-agnostic paints.

/// Color parsing with verbatim text retention.
pub mod color;
/// Solid and gradient fills.
pub mod fill;
