//! Tour cost and per-vehicle distance budget checks.

use crate::distance::{ArcCost, DistanceMatrix};
use crate::models::VehicleAssignment;

/// A vehicle route whose depot-closed distance exceeds the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetViolation {
    /// Vehicle whose route is too long.
    pub vehicle_id: usize,
    /// Actual distance in meters.
    pub distance: i64,
    /// Maximum allowed distance in meters.
    pub max_distance: i64,
}

/// Scores tours: arc distance plus a span cost per edge.
///
/// The span term charges `span_cost_coefficient` for every edge of the
/// depot-closed tour, penalizing routes by their length in stops.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::DistanceMatrix;
/// use u_route_optimizer::evaluation::TourEvaluator;
///
/// let dm = DistanceMatrix::from_data(3, vec![0, 2, 3, 2, 0, 4, 3, 4, 0]).unwrap();
/// let eval = TourEvaluator::new(100);
/// // 2 + 4 + 3 meters over three edges.
/// assert_eq!(eval.cost(&[1, 2], &dm), 9 + 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourEvaluator {
    span_cost_coefficient: i64,
}

impl TourEvaluator {
    /// Creates an evaluator with the given per-edge span cost.
    pub fn new(span_cost_coefficient: i64) -> Self {
        Self {
            span_cost_coefficient,
        }
    }

    /// Span cost of a depot-closed route with `stops` non-depot stops.
    pub fn span_cost(&self, stops: usize) -> i64 {
        let edges = if stops == 0 { 0 } else { stops as i64 + 1 };
        self.span_cost_coefficient * edges
    }

    /// Total cost of a route under arbitrary arc costs.
    pub fn cost_with<C: ArcCost>(&self, route: &[usize], arcs: &C) -> i64 {
        arcs.route_cost(route, 0) + self.span_cost(route.len())
    }

    /// Total cost of a route under plain distances.
    pub fn cost(&self, route: &[usize], distances: &DistanceMatrix) -> i64 {
        self.cost_with(route, distances)
    }
}

/// Checks every vehicle route against `max_distance` meters.
///
/// Returns one violation per offending vehicle, in vehicle order.
pub fn check_distance_budget(
    assignment: &VehicleAssignment,
    distances: &DistanceMatrix,
    max_distance: i64,
) -> Vec<BudgetViolation> {
    assignment
        .routes()
        .iter()
        .filter_map(|route| {
            let distance = distances.tour_distance(route.stops());
            (distance > max_distance).then_some(BudgetViolation {
                vehicle_id: route.vehicle_id(),
                distance,
                max_distance,
            })
        })
        .collect()
}
