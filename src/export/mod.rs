//! Export entry points and the render session state machine.

/// `paint_symbol`, `export_raster`, and `export_vector`.
pub mod pipeline;
/// Per-backend session that retains the last successful artifact.
pub mod session;
