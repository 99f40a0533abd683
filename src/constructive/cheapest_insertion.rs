//! Cheapest-insertion constructive heuristic.
//!
//! Builds a tour greedily: starting from the depot alone, repeatedly insert
//! the unvisited stop whose cheapest insertion costs least, where inserting
//! stop `k` into edge `(a, b)` costs
//!
//! ```text
//! d(a, k) + d(k, b) - d(a, b)
//! ```
//!
//! Ties go to the lowest stop index, then the earliest position, so the
//! result is deterministic for a given matrix.
//!
//! Each unvisited stop keeps its cheapest edge of the current tour. An
//! insertion splits one edge `(a, b)` into `(a, k)` and `(k, b)`; other
//! stops only compare against those two new edges, and a full rescan is
//! needed only for stops whose cached edge was `(a, b)`.
//!
//! # Complexity
//!
//! O(n²) where n = number of stops (n insertions, each updating n cached
//! entries in constant time). Rescans of stops whose cached edge was split
//! add O(n) each and are rare in practice.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An Analysis of
//! Several Heuristics for the Traveling Salesman Problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::models::Tour;

/// Cheapest known insertion of one unvisited stop.
///
/// An edge is named by its tail: `after == 0` is the edge leaving the depot.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: i64,
    after: usize,
}

/// Closed tour under construction, with O(1) successor and position lookup.
struct PartialTour {
    order: Vec<usize>,
    next: Vec<usize>,
    index: Vec<usize>,
}

impl PartialTour {
    fn new(n: usize) -> Self {
        Self {
            order: Vec::with_capacity(n.saturating_sub(1)),
            next: vec![0; n],
            index: vec![0; n],
        }
    }

    /// Position in `order` at which a stop inserted after `after` lands.
    fn slot(&self, after: usize) -> usize {
        if after == 0 {
            0
        } else {
            self.index[after] + 1
        }
    }

    fn insertion_cost(&self, distances: &DistanceMatrix, after: usize, k: usize) -> i64 {
        let b = self.next[after];
        distances.get(after, k) + distances.get(k, b) - distances.get(after, b)
    }

    /// Scans every edge in tour order; the first strict minimum wins.
    fn best_for(&self, distances: &DistanceMatrix, k: usize) -> Candidate {
        let mut best = Candidate {
            cost: self.insertion_cost(distances, 0, k),
            after: 0,
        };
        for &a in &self.order {
            let cost = self.insertion_cost(distances, a, k);
            if cost < best.cost {
                best = Candidate { cost, after: a };
            }
        }
        best
    }

    fn insert_after(&mut self, after: usize, k: usize) {
        let slot = self.slot(after);
        self.order.insert(slot, k);
        for (i, &stop) in self.order.iter().enumerate().skip(slot) {
            self.index[stop] = i;
        }
        self.next[k] = self.next[after];
        self.next[after] = k;
    }
}

/// Constructs a tour using cheapest insertion.
///
/// Stop 0 of `distances` is the depot. The returned tour visits every other
/// stop exactly once.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::DistanceMatrix;
/// use u_route_optimizer::constructive::cheapest_insertion;
///
/// // Depot and three stops on a line at 1, 2, 3.
/// let dm = DistanceMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let tour = cheapest_insertion(&dm).unwrap();
/// assert_eq!(dm.tour_distance(tour.stops()), 6);
/// ```
pub fn cheapest_insertion(distances: &DistanceMatrix) -> Result<Tour> {
    let n = distances.size();
    if n <= 1 {
        return Ok(Tour::from_permutation(Vec::new()));
    }

    let mut tour = PartialTour::new(n);
    let mut candidates: Vec<Option<Candidate>> = (0..n)
        .map(|k| (k != 0).then(|| tour.best_for(distances, k)))
        .collect();

    for _ in 1..n {
        let mut best: Option<(usize, Candidate)> = None;
        for (k, candidate) in candidates.iter().enumerate() {
            if let Some(c) = candidate {
                if best.map_or(true, |(_, b)| c.cost < b.cost) {
                    best = Some((k, *c));
                }
            }
        }

        let (k, chosen) = best.ok_or_else(|| RoutingError::NoFeasibleSolution {
            reason: format!(
                "no insertion position for remaining stops ({} placed)",
                tour.order.len()
            ),
        })?;
        let a = chosen.after;
        tour.insert_after(a, k);
        candidates[k] = None;

        for j in 1..n {
            let Some(current) = candidates[j] else {
                continue;
            };
            if current.after == a {
                candidates[j] = Some(tour.best_for(distances, j));
                continue;
            }
            let mut best_j = current;
            for edge in [a, k] {
                let cost = tour.insertion_cost(distances, edge, j);
                if cost < best_j.cost
                    || (cost == best_j.cost && tour.slot(edge) < tour.slot(best_j.after))
                {
                    best_j = Candidate { cost, after: edge };
                }
            }
            candidates[j] = Some(best_j);
        }
    }

    let tour = tour.order;
    debug!(
        stops = tour.len(),
        distance = distances.tour_distance(&tour),
        "cheapest insertion complete"
    );
    Ok(Tour::from_permutation(tour))
}
