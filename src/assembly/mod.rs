//! Turning a solved tour into the caller-facing result.
//!
//! - [`ResultAssembler`] — Distances, duration estimates, and polylines

mod assembler;

pub use assembler::{ResultAssembler, DEFAULT_AVERAGE_SPEED_KMH};
