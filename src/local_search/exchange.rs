//! Intra-route pairwise exchange.
//!
//! # Algorithm
//!
//! Swaps the positions of two stops `r[i]` and `r[j]`, i < j. For
//! non-adjacent positions the four edges around both stops change:
//!
//! ```text
//! delta = c(p_i, r[j]) + c(r[j], n_i) + c(p_j, r[i]) + c(r[i], n_j)
//!       - c(p_i, r[i]) - c(r[i], n_i) - c(p_j, r[j]) - c(r[j], n_j)
//! ```
//!
//! Adjacent swaps only touch three edges. The best improving swap of a pass
//! is applied.
//!
//! # Complexity
//!
//! O(n²) per pass.

use crate::distance::ArcCost;

/// Applies exchange improvement until no swap reduces the cost.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::DistanceMatrix;
/// use u_route_optimizer::local_search::exchange_improve;
///
/// let dm = DistanceMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let (_, cost) = exchange_improve(&[3, 2, 1], 0, &dm);
/// assert_eq!(cost, 6);
/// ```
pub fn exchange_improve<C: ArcCost>(route: &[usize], depot: usize, cost: &C) -> (Vec<usize>, i64) {
    let mut current = route.to_vec();
    while exchange_pass(&mut current, depot, cost) > 0 {}
    let total = cost.route_cost(&current, depot);
    (current, total)
}

/// Applies the best improving swap, if any. Returns the number of accepted
/// moves (0 or 1).
pub fn exchange_pass<C: ArcCost>(route: &mut [usize], depot: usize, cost: &C) -> u64 {
    let n = route.len();
    if n < 2 {
        return 0;
    }

    let mut best: Option<(usize, usize, i64)> = None;
    for i in 0..n - 1 {
        for j in i + 1..n {
            let delta = exchange_delta(route, depot, cost, i, j);
            if delta < best.map_or(0, |(_, _, d)| d) {
                best = Some((i, j, delta));
            }
        }
    }

    match best {
        Some((i, j, _)) => {
            route.swap(i, j);
            1
        }
        None => 0,
    }
}

/// Computes the cost change from swapping `route[i]` and `route[j]`, i < j.
pub(crate) fn exchange_delta<C: ArcCost>(
    route: &[usize],
    depot: usize,
    cost: &C,
    i: usize,
    j: usize,
) -> i64 {
    let n = route.len();
    let a = route[i];
    let b = route[j];
    let prev_i = if i == 0 { depot } else { route[i - 1] };
    let next_j = if j == n - 1 { depot } else { route[j + 1] };

    if j == i + 1 {
        let old = cost.arc(prev_i, a) + cost.arc(a, b) + cost.arc(b, next_j);
        let new = cost.arc(prev_i, b) + cost.arc(b, a) + cost.arc(a, next_j);
        return new - old;
    }

    let next_i = route[i + 1];
    let prev_j = route[j - 1];
    let old = cost.arc(prev_i, a) + cost.arc(a, next_i) + cost.arc(prev_j, b) + cost.arc(b, next_j);
    let new = cost.arc(prev_i, b) + cost.arc(b, next_i) + cost.arc(prev_j, a) + cost.arc(a, next_j);
    new - old
}
