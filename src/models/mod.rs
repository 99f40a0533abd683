//! Domain model types for route optimization.
//!
//! Provides validated coordinates, delivery points and stops, tours with
//! their per-vehicle split, and the result returned to callers.

mod geo_point;
mod solution;
mod stop;
mod tour;

pub use geo_point::GeoPoint;
pub use solution::{OptimizationResult, SearchStats, VehicleRouteSummary};
pub use stop::{DeliveryPoint, Stop, TimeWindow};
pub use tour::{Tour, VehicleAssignment, VehicleRoute};
