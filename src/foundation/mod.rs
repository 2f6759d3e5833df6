//! Shared primitives: geometry re-exports, pixel helpers, and the crate error type.

pub(crate) mod core;
pub(crate) mod error;
