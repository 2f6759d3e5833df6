//! Render inputs: the encoder's module matrix and the styling configuration.

/// Style configuration and option ranges.
pub mod config;
/// Immutable boolean module grid.
pub mod matrix;
