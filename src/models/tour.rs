//! Tour and vehicle assignment types.

use crate::error::InvalidInput;

/// An ordered visiting sequence of stop indices.
///
/// The depot (index 0) is implicit at both ends and never stored. A valid
/// tour over a matrix of size `n` contains each of `1..n` exactly once.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::Tour;
///
/// let tour = Tour::new(vec![2, 1, 3], 4).unwrap();
/// assert_eq!(tour.stops(), &[2, 1, 3]);
/// assert!(Tour::new(vec![1, 1, 3], 4).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tour {
    stops: Vec<usize>,
}

impl Tour {
    /// Creates a tour, checking it is a permutation of `1..matrix_size`.
    pub fn new(stops: Vec<usize>, matrix_size: usize) -> Result<Self, InvalidInput> {
        if matrix_size == 0 {
            return Err(InvalidInput::NoStops);
        }
        if stops.len() != matrix_size - 1 {
            return Err(InvalidInput::InvalidTour(format!(
                "expected {} stops, got {}",
                matrix_size - 1,
                stops.len()
            )));
        }
        let mut seen = vec![false; matrix_size];
        for &s in &stops {
            if s == 0 || s >= matrix_size {
                return Err(InvalidInput::InvalidTour(format!(
                    "stop index {s} out of range 1..{matrix_size}"
                )));
            }
            if seen[s] {
                return Err(InvalidInput::InvalidTour(format!("stop {s} visited twice")));
            }
            seen[s] = true;
        }
        Ok(Self { stops })
    }

    /// Wraps a sequence already known to be a permutation.
    pub(crate) fn from_permutation(stops: Vec<usize>) -> Self {
        Self { stops }
    }

    /// Stop indices in visit order (depot excluded).
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Number of non-depot stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the tour visits no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// The stops handled by one vehicle, in visit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRoute {
    vehicle_id: usize,
    stops: Vec<usize>,
}

impl VehicleRoute {
    /// Creates a route for the given vehicle.
    pub fn new(vehicle_id: usize, stops: Vec<usize>) -> Self {
        Self { vehicle_id, stops }
    }

    /// Vehicle position in the fleet (0-based).
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Stop indices in visit order (depot excluded).
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Number of deliveries on this route.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this vehicle serves nothing.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// A split of one tour into per-vehicle routes.
///
/// Concatenating the routes in vehicle order yields the original tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleAssignment {
    routes: Vec<VehicleRoute>,
}

impl VehicleAssignment {
    pub(crate) fn new(routes: Vec<VehicleRoute>) -> Self {
        Self { routes }
    }

    /// Per-vehicle routes, ordered by vehicle id.
    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.routes.len()
    }

    /// Route lengths in vehicle order.
    pub fn sizes(&self) -> Vec<usize> {
        self.routes.iter().map(VehicleRoute::len).collect()
    }

    /// All stops in vehicle order.
    pub fn flatten(&self) -> Vec<usize> {
        self.routes
            .iter()
            .flat_map(|r| r.stops.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_valid() {
        let t = Tour::new(vec![3, 1, 2], 4).expect("valid");
        assert_eq!(t.len(), 3);
        assert_eq!(t.stops(), &[3, 1, 2]);
    }

    #[test]
    fn test_tour_rejects_depot_and_duplicates() {
        assert!(Tour::new(vec![0, 1, 2], 4).is_err());
        assert!(Tour::new(vec![1, 2, 2], 4).is_err());
        assert!(Tour::new(vec![1, 2], 4).is_err());
        assert!(Tour::new(vec![1, 2, 4], 4).is_err());
    }

    #[test]
    fn test_tour_empty() {
        let t = Tour::new(vec![], 1).expect("depot only");
        assert!(t.is_empty());
        assert_eq!(t.stops(), &[] as &[usize]);
        assert!(Tour::new(vec![], 0).is_err());
    }

    #[test]
    fn test_assignment_flatten() {
        let a = VehicleAssignment::new(vec![
            VehicleRoute::new(0, vec![4, 2]),
            VehicleRoute::new(1, vec![1, 3]),
        ]);
        assert_eq!(a.num_vehicles(), 2);
        assert_eq!(a.sizes(), vec![2, 2]);
        assert_eq!(a.flatten(), vec![4, 2, 1, 3]);
    }
}
