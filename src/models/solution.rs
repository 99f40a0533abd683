//! Optimization result types.

use std::time::Duration;

use serde::Serialize;

use super::GeoPoint;
use crate::local_search::StopReason;

/// Counters collected while improving a tour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Improvement passes executed (2-opt, or-opt, and exchange sweeps).
    pub iterations: u64,
    /// Guided local search penalty rounds completed.
    pub penalty_rounds: u32,
    /// Accepted moves across all passes.
    pub improving_moves: u64,
    /// Cost of the constructed tour, in meters plus span cost.
    pub initial_cost: i64,
    /// Cost of the returned tour, in meters plus span cost.
    pub final_cost: i64,
    /// Wall-clock time spent in local search.
    pub elapsed: Duration,
}

/// Route of a single vehicle in the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRouteSummary {
    /// Vehicle identifier.
    pub vehicle_id: usize,
    /// Delivery indices (0-based, as in the request) in visit order.
    pub sequence: Vec<usize>,
    /// Number of deliveries on this route.
    pub delivery_count: usize,
    /// Depot-closed route distance in meters.
    pub distance_meters: f64,
    /// Estimated driving time in minutes.
    pub estimated_duration_minutes: f64,
    /// Depot → deliveries → depot coordinates.
    pub polyline: Vec<GeoPoint>,
}

/// The outcome of an optimization request.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
/// use u_route_optimizer::optimize_route;
///
/// let depot = GeoPoint::new(40.7128, -74.0060).unwrap();
/// let points = vec![DeliveryPoint::new(GeoPoint::new(40.7580, -73.9855).unwrap())];
/// let result = optimize_route(depot, &points, 1, 1.0).unwrap();
/// assert_eq!(result.sequence, vec![0]);
/// assert_eq!(result.polyline.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    /// Delivery indices (0-based, as in the request) in visit order.
    pub sequence: Vec<usize>,
    /// Distance in meters of `sequence` driven as one depot-closed tour.
    ///
    /// With several vehicles this is not the fleet's driving distance: each
    /// vehicle also returns to and leaves the depot between chunks. Sum
    /// [`VehicleRouteSummary::distance_meters`] for the fleet total.
    pub total_distance_meters: f64,
    /// Estimated driving time in minutes.
    pub estimated_duration_minutes: f64,
    /// Depot → deliveries → depot coordinates.
    pub polyline: Vec<GeoPoint>,
    /// Vehicles the sequence was split across.
    pub num_vehicles: usize,
    /// Per-vehicle split of `sequence`.
    pub vehicle_routes: Vec<VehicleRouteSummary>,
    /// Why local search stopped.
    pub stop_reason: StopReason,
    /// Local search counters.
    pub stats: SearchStats,
}

impl OptimizationResult {
    /// Total distance in kilometers, rounded to two decimals.
    pub fn total_distance_km(&self) -> f64 {
        round2(self.total_distance_meters / 1000.0)
    }

    /// Estimated duration in minutes, rounded to two decimals.
    pub fn estimated_duration_rounded(&self) -> f64 {
        round2(self.estimated_duration_minutes)
    }

    /// Returns `true` if the search was cut short and the route may be
    /// suboptimal. Retrying with a larger budget can help.
    pub fn is_partial(&self) -> bool {
        self.stop_reason.is_partial()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OptimizationResult {
        OptimizationResult {
            sequence: vec![1, 0],
            total_distance_meters: 12_345.0,
            estimated_duration_minutes: 14.814,
            polyline: Vec::new(),
            num_vehicles: 1,
            vehicle_routes: Vec::new(),
            stop_reason: StopReason::TimeLimit,
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn test_rounded_accessors() {
        let r = sample();
        assert_eq!(r.total_distance_km(), 12.35);
        assert_eq!(r.estimated_duration_rounded(), 14.81);
    }

    #[test]
    fn test_partial_flag() {
        let mut r = sample();
        assert!(r.is_partial());
        r.stop_reason = StopReason::PenaltyRoundsExhausted;
        assert!(!r.is_partial());
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["sequence"], serde_json::json!([1, 0]));
        assert_eq!(json["stop_reason"], "time_limit");
    }
}
