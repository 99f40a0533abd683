//! Geographic distance model and distance matrix.
//!
//! Provides Haversine great-circle distances and a dense integer matrix of
//! meters between all stops of a request.

mod haversine;
mod matrix;

pub use haversine::{haversine_km, EARTH_RADIUS_KM};
pub use matrix::{ArcCost, DistanceMatrix};
