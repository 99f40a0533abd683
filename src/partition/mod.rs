//! Splitting a single tour across several vehicles.
//!
//! - [`partition`] — Contiguous even split of the tour order

mod even_split;

pub use even_split::partition;
