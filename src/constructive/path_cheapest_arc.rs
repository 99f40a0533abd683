//! Path-cheapest-arc constructive heuristic.
//!
//! Builds the tour as a path: starting from the depot, always extend to the
//! unvisited stop reachable by the cheapest arc from the current path end.
//! Equivalent to nearest-neighbor with lowest-index tie breaking.
//!
//! # Complexity
//!
//! O(n²) where n = number of stops.
//!
//! Cheaper than cheapest insertion but usually leaves a long closing arc
//! back to the depot for local search to repair.

use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::models::Tour;

/// Constructs a tour by repeatedly following the cheapest outgoing arc.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::DistanceMatrix;
/// use u_route_optimizer::constructive::path_cheapest_arc;
///
/// let dm = DistanceMatrix::from_data(3, vec![
///     0, 10, 1,
///     10, 0, 9,
///     1, 9, 0,
/// ]).unwrap();
/// let tour = path_cheapest_arc(&dm).unwrap();
/// assert_eq!(tour.stops(), &[2, 1]);
/// ```
pub fn path_cheapest_arc(distances: &DistanceMatrix) -> Result<Tour> {
    let n = distances.size();
    if n <= 1 {
        return Ok(Tour::from_permutation(Vec::new()));
    }

    let mut unvisited: Vec<usize> = (1..n).collect();
    let mut route = Vec::with_capacity(n - 1);
    let mut current = 0;

    while !unvisited.is_empty() {
        let next = distances
            .nearest_neighbor(current, &unvisited)
            .ok_or_else(|| RoutingError::NoFeasibleSolution {
                reason: format!("no arc leaves stop {current}"),
            })?;
        unvisited.retain(|&s| s != next);
        route.push(next);
        current = next;
    }

    debug!(
        stops = route.len(),
        distance = distances.tour_distance(&route),
        "path cheapest arc complete"
    );
    Ok(Tour::from_permutation(route))
}
