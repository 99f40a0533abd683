//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions (i, j) in a route, compute the change in cost
//! from reversing the segment between them:
//!
//! ```text
//! delta = c(prev_i, r[j]) + c(r[i], next_j) - c(prev_i, r[i]) - c(r[j], next_j)
//! ```
//!
//! If delta < 0, reverse the segment [i..=j] and accept the improvement.
//! Repeat until no further improvements are found (first-improvement strategy).
//! The delta assumes symmetric costs.
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::ArcCost;

/// Applies 2-opt improvement to a single route until no move improves it.
///
/// The route is assumed to start and end at `depot`. Returns the improved
/// stop sequence and its cost.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::DistanceMatrix;
/// use u_route_optimizer::local_search::two_opt_improve;
///
/// // Five locations with symmetric integer distances.
/// let dm = DistanceMatrix::from_data(5, vec![
///     0, 1, 2, 1, 1,
///     1, 0, 1, 2, 2,
///     2, 1, 0, 1, 3,
///     1, 2, 1, 0, 2,
///     1, 2, 3, 2, 0,
/// ]).unwrap();
/// let (_, cost) = two_opt_improve(&[1, 3, 2, 4], 0, &dm);
/// assert!(cost <= dm.tour_distance(&[1, 3, 2, 4]));
/// ```
pub fn two_opt_improve<C: ArcCost>(route: &[usize], depot: usize, cost: &C) -> (Vec<usize>, i64) {
    let mut current = route.to_vec();
    while two_opt_pass(&mut current, depot, cost) > 0 {}
    let total = cost.route_cost(&current, depot);
    (current, total)
}

/// Runs one sweep over all (i, j) pairs, applying every improving reversal.
///
/// Returns the number of accepted moves.
pub fn two_opt_pass<C: ArcCost>(route: &mut [usize], depot: usize, cost: &C) -> u64 {
    let n = route.len();
    if n < 2 {
        return 0;
    }

    let mut moves = 0;
    for i in 0..n - 1 {
        for j in i + 1..n {
            if two_opt_delta(route, depot, cost, i, j) < 0 {
                route[i..=j].reverse();
                moves += 1;
            }
        }
    }
    moves
}

/// Computes the cost change from reversing `route[i..=j]`.
///
/// Before: ...-prev_i - route[i] - route[i+1] - ... - route[j] - next_j-...
/// After:  ...-prev_i - route[j] - route[j-1] - ... - route[i] - next_j-...
fn two_opt_delta<C: ArcCost>(route: &[usize], depot: usize, cost: &C, i: usize, j: usize) -> i64 {
    let n = route.len();
    let prev_i = if i == 0 { depot } else { route[i - 1] };
    let next_j = if j == n - 1 { depot } else { route[j + 1] };

    let old_cost = cost.arc(prev_i, route[i]) + cost.arc(route[j], next_j);
    let new_cost = cost.arc(prev_i, route[j]) + cost.arc(route[i], next_j);

    new_cost - old_cost
}
