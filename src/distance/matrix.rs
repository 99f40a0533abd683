//! Dense integer distance matrix.

use crate::error::InvalidInput;
use crate::models::GeoPoint;

use super::haversine_km;

/// Cost of traveling between two matrix locations.
///
/// Implemented by [`DistanceMatrix`] for plain distances and by the guided
/// local search for penalty-augmented costs, so the move operators work on
/// either.
pub trait ArcCost {
    /// Cost of the arc `from → to`.
    fn arc(&self, from: usize, to: usize) -> i64;

    /// Cost of the depot-closed tour `depot → route[0] → … → depot`.
    fn route_cost(&self, route: &[usize], depot: usize) -> i64 {
        let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
            return 0;
        };
        let inner: i64 = route.windows(2).map(|w| self.arc(w[0], w[1])).sum();
        self.arc(depot, first) + inner + self.arc(last, depot)
    }
}

/// A dense n×n matrix of distances in meters, stored in row-major order.
///
/// Built from coordinates it is symmetric with a zero diagonal. Integer
/// meters keep repeated additions during search exact.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::GeoPoint;
/// use u_route_optimizer::distance::DistanceMatrix;
///
/// let points = vec![
///     GeoPoint::new(0.0, 0.0).unwrap(),
///     GeoPoint::new(0.0, 1.0).unwrap(),
/// ];
/// let dm = DistanceMatrix::from_points(&points).unwrap();
/// assert_eq!(dm.size(), 2);
/// assert_eq!(dm.get(0, 1), 111_195);
/// assert_eq!(dm.get(1, 0), dm.get(0, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Computes the Haversine matrix for the given points (depot first).
    ///
    /// Entries are `round(km * 1000)`. Fails if `points` is empty.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self, InvalidInput> {
        if points.is_empty() {
            return Err(InvalidInput::NoStops);
        }
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let meters = (haversine_km(&points[i], &points[j]) * 1000.0).round() as i64;
                dm.set(i, j, meters);
                dm.set(j, i, meters);
            }
        }
        Ok(dm)
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size` or any
    /// entry is negative.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size || data.iter().any(|&d| d < 0) {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: i64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Returns `true` if every diagonal entry is zero.
    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.size).all(|i| self.get(i, i) == 0)
    }

    /// Returns the nearest neighbor of `from` among the given candidates.
    ///
    /// Ties go to the candidate listed first. Returns `None` if
    /// `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by_key(|&c| self.get(from, c))
    }

    /// Distance of the depot-closed tour `0 → route → 0` in meters.
    pub fn tour_distance(&self, route: &[usize]) -> i64 {
        self.route_cost(route, 0)
    }
}

impl ArcCost for DistanceMatrix {
    #[inline]
    fn arc(&self, from: usize, to: usize) -> i64 {
        self.get(from, to)
    }
}
