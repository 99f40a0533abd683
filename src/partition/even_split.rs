//! Even split of a giant tour into per-vehicle routes.
//!
//! # Algorithm
//!
//! The tour is cut into `num_vehicles` contiguous chunks of
//! `len / num_vehicles` stops, keeping visit order. The remainder goes to
//! the last vehicle. When there are fewer stops than vehicles, the earlier
//! vehicles get empty routes and the last one takes everything.
//!
//! Routes are not re-optimized after the split.
//!
//! # Complexity
//!
//! O(n).

use tracing::debug;

use crate::error::{InvalidInput, Result};
use crate::models::{Tour, VehicleAssignment, VehicleRoute};

/// Splits `tour` into `num_vehicles` contiguous, order-preserving routes.
///
/// # Errors
///
/// Returns [`InvalidInput::InvalidVehicleCount`] if `num_vehicles` is zero.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::Tour;
/// use u_route_optimizer::partition::partition;
///
/// let tour = Tour::new((1..=10).collect(), 11).unwrap();
/// let assignment = partition(&tour, 3).unwrap();
/// assert_eq!(assignment.sizes(), vec![3, 3, 4]);
/// assert_eq!(assignment.routes()[2].stops(), &[7, 8, 9, 10]);
/// ```
pub fn partition(tour: &Tour, num_vehicles: usize) -> Result<VehicleAssignment> {
    if num_vehicles == 0 {
        return Err(InvalidInput::InvalidVehicleCount(num_vehicles).into());
    }

    let stops = tour.stops();
    let chunk = stops.len() / num_vehicles;
    let routes = (0..num_vehicles)
        .map(|v| {
            let start = v * chunk;
            let end = if v + 1 == num_vehicles {
                stops.len()
            } else {
                start + chunk
            };
            VehicleRoute::new(v, stops[start..end].to_vec())
        })
        .collect();

    let assignment = VehicleAssignment::new(routes);
    debug!(num_vehicles, sizes = ?assignment.sizes(), "tour partitioned");
    Ok(assignment)
}
