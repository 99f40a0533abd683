//! Result assembly.
//!
//! Maps stop indices back to request order (stop `k + 1` is delivery `k`),
//! measures every route on the distance matrix, estimates driving time at a
//! constant average speed, and lays out depot-closed polylines.

use crate::distance::DistanceMatrix;
use crate::local_search::StopReason;
use crate::models::{
    GeoPoint, OptimizationResult, SearchStats, Stop, VehicleAssignment, VehicleRouteSummary,
};

/// Average urban driving speed used for duration estimates.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 50.0;

/// Builds [`OptimizationResult`]s from solved assignments.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::assembly::ResultAssembler;
///
/// let assembler = ResultAssembler::new(50.0);
/// // 25 km at 50 km/h.
/// assert_eq!(assembler.estimate_minutes(25_000.0), 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultAssembler {
    average_speed_kmh: f64,
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_AVERAGE_SPEED_KMH)
    }
}

impl ResultAssembler {
    /// Creates an assembler estimating durations at `average_speed_kmh`.
    pub fn new(average_speed_kmh: f64) -> Self {
        Self { average_speed_kmh }
    }

    /// Driving time in minutes for `meters` at the configured speed.
    pub fn estimate_minutes(&self, meters: f64) -> f64 {
        (meters / 1000.0) / self.average_speed_kmh * 60.0
    }

    /// Assembles the result for `assignment` over `stops`.
    ///
    /// `stops` must be the list the matrix was built from, depot first.
    /// The overall sequence is the concatenation of the vehicle routes and
    /// its distance is measured as one depot-closed tour, so with several
    /// vehicles it is at most the sum of the per-vehicle distances.
    pub fn assemble(
        &self,
        stops: &[Stop],
        distances: &DistanceMatrix,
        assignment: &VehicleAssignment,
        stop_reason: StopReason,
        stats: SearchStats,
    ) -> OptimizationResult {
        let tour = assignment.flatten();
        let total_distance_meters = distances.tour_distance(&tour) as f64;

        let vehicle_routes = assignment
            .routes()
            .iter()
            .map(|route| {
                let distance_meters = distances.tour_distance(route.stops()) as f64;
                VehicleRouteSummary {
                    vehicle_id: route.vehicle_id(),
                    sequence: delivery_indices(route.stops()),
                    delivery_count: route.len(),
                    distance_meters,
                    estimated_duration_minutes: self.estimate_minutes(distance_meters),
                    polyline: polyline(stops, route.stops()),
                }
            })
            .collect();

        OptimizationResult {
            sequence: delivery_indices(&tour),
            total_distance_meters,
            estimated_duration_minutes: self.estimate_minutes(total_distance_meters),
            polyline: polyline(stops, &tour),
            num_vehicles: assignment.num_vehicles(),
            vehicle_routes,
            stop_reason,
            stats,
        }
    }
}

fn delivery_indices(route: &[usize]) -> Vec<usize> {
    route.iter().map(|&s| s - 1).collect()
}

/// Depot → route → depot coordinates. Empty for an empty route.
fn polyline(stops: &[Stop], route: &[usize]) -> Vec<GeoPoint> {
    let Some(depot) = stops.first() else {
        return Vec::new();
    };
    if route.is_empty() {
        return Vec::new();
    }
    let mut line = Vec::with_capacity(route.len() + 2);
    line.push(depot.point());
    line.extend(route.iter().map(|&s| stops[s].point()));
    line.push(depot.point());
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryPoint, VehicleRoute};

    fn fixture() -> (Vec<Stop>, DistanceMatrix) {
        let depot = GeoPoint::new(0.0, 0.0).expect("valid");
        let deliveries: Vec<DeliveryPoint> = [(0.0, 0.1), (0.0, 0.2), (0.0, 0.3)]
            .iter()
            .map(|&(lat, lon)| DeliveryPoint::new(GeoPoint::new(lat, lon).expect("valid")))
            .collect();
        let stops = Stop::from_request(depot, &deliveries);
        let points: Vec<GeoPoint> = stops.iter().map(Stop::point).collect();
        let dm = DistanceMatrix::from_points(&points).expect("non-empty");
        (stops, dm)
    }

    #[test]
    fn test_single_vehicle_result() {
        let (stops, dm) = fixture();
        let assignment = VehicleAssignment::new(vec![VehicleRoute::new(0, vec![2, 1, 3])]);
        let result = ResultAssembler::default().assemble(
            &stops,
            &dm,
            &assignment,
            StopReason::Converged,
            SearchStats::default(),
        );

        assert_eq!(result.sequence, vec![1, 0, 2]);
        assert_eq!(result.total_distance_meters, dm.tour_distance(&[2, 1, 3]) as f64);
        assert_eq!(result.polyline.len(), 5);
        assert_eq!(result.polyline[0], stops[0].point());
        assert_eq!(result.polyline[1], stops[2].point());
        assert_eq!(result.polyline[4], stops[0].point());
        assert_eq!(result.num_vehicles, 1);
        assert_eq!(result.vehicle_routes[0].delivery_count, 3);
    }

    #[test]
    fn test_duration_estimate() {
        let (stops, dm) = fixture();
        let assignment = VehicleAssignment::new(vec![VehicleRoute::new(0, vec![1, 2, 3])]);
        let assembler = ResultAssembler::new(50.0);
        let result = assembler.assemble(
            &stops,
            &dm,
            &assignment,
            StopReason::Converged,
            SearchStats::default(),
        );
        let expected = result.total_distance_meters / 1000.0 / 50.0 * 60.0;
        assert!((result.estimated_duration_minutes - expected).abs() < 1e-9);
    }

    #[test]
    fn test_vehicle_summaries() {
        let (stops, dm) = fixture();
        let assignment = VehicleAssignment::new(vec![
            VehicleRoute::new(0, vec![]),
            VehicleRoute::new(1, vec![1, 2, 3]),
        ]);
        let result = ResultAssembler::default().assemble(
            &stops,
            &dm,
            &assignment,
            StopReason::Converged,
            SearchStats::default(),
        );

        let empty = &result.vehicle_routes[0];
        assert_eq!(empty.delivery_count, 0);
        assert_eq!(empty.distance_meters, 0.0);
        assert!(empty.polyline.is_empty());

        let full = &result.vehicle_routes[1];
        assert_eq!(full.vehicle_id, 1);
        assert_eq!(full.sequence, vec![0, 1, 2]);
        assert_eq!(full.distance_meters, result.total_distance_meters);
    }

    #[test]
    fn test_total_distance_is_single_tour_not_fleet_sum() {
        let (stops, dm) = fixture();
        let assignment = VehicleAssignment::new(vec![
            VehicleRoute::new(0, vec![1, 2]),
            VehicleRoute::new(1, vec![3]),
        ]);
        let result = ResultAssembler::default().assemble(
            &stops,
            &dm,
            &assignment,
            StopReason::Converged,
            SearchStats::default(),
        );

        let fleet: f64 = result.vehicle_routes.iter().map(|r| r.distance_meters).sum();
        assert_eq!(result.total_distance_meters, dm.tour_distance(&[1, 2, 3]) as f64);
        assert_eq!(
            fleet,
            (dm.tour_distance(&[1, 2]) + dm.tour_distance(&[3])) as f64
        );
        // Stop 2 back to the depot and out to stop 3 is longer than 2 → 3.
        assert!(fleet > result.total_distance_meters);
    }
}
