//! Intra-route Or-opt improvement.
//!
//! # Algorithm
//!
//! Tries moving segments of 1, 2, or 3 consecutive stops to a different
//! position within the same route, keeping their orientation. A segment of
//! length 1 is a single-stop relocation. For each segment size the best
//! move of the pass is applied if it reduces cost.
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::distance::ArcCost;

/// Longest segment the operator relocates.
pub const MAX_SEGMENT_LEN: usize = 3;

/// Applies Or-opt improvement to a single route until no move improves it.
///
/// Returns the improved stop sequence and its cost.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::{ArcCost, DistanceMatrix};
/// use u_route_optimizer::local_search::or_opt_improve;
///
/// // Depot and three stops on a line; stop 3 is visited too early.
/// let dm = DistanceMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let (route, cost) = or_opt_improve(&[3, 1, 2], 0, &dm);
/// assert_eq!(cost, 6);
/// assert_eq!(cost, dm.route_cost(&route, 0));
/// ```
pub fn or_opt_improve<C: ArcCost>(route: &[usize], depot: usize, cost: &C) -> (Vec<usize>, i64) {
    let mut current = route.to_vec();
    while or_opt_pass(&mut current, depot, cost) > 0 {}
    let total = cost.route_cost(&current, depot);
    (current, total)
}

/// Runs one pass for each segment length 1..=3.
///
/// Returns the number of accepted moves.
pub fn or_opt_pass<C: ArcCost>(route: &mut Vec<usize>, depot: usize, cost: &C) -> u64 {
    if route.len() < 2 {
        return 0;
    }
    let mut moves = 0;
    for seg_len in 1..=MAX_SEGMENT_LEN.min(route.len() - 1) {
        if try_or_opt_move(route, depot, cost, seg_len) {
            moves += 1;
        }
    }
    moves
}

/// Finds and applies the best relocation of a segment of `seg_len` stops.
/// Returns true if improved.
fn try_or_opt_move<C: ArcCost>(
    route: &mut Vec<usize>,
    depot: usize,
    cost: &C,
    seg_len: usize,
) -> bool {
    let n = route.len();
    if n < seg_len + 1 {
        return false;
    }

    let mut best_delta = 0;
    let mut best_from = 0;
    let mut best_to = 0;

    for from in 0..=(n - seg_len) {
        let prev = if from == 0 { depot } else { route[from - 1] };
        let after = if from + seg_len >= n {
            depot
        } else {
            route[from + seg_len]
        };
        let seg_first = route[from];
        let seg_last = route[from + seg_len - 1];

        // Old edges: prev→seg_first + seg_last→after
        // New edges (after removal): prev→after
        let removal_gain =
            cost.arc(prev, seg_first) + cost.arc(seg_last, after) - cost.arc(prev, after);

        // `to` is the original index the segment is inserted before (n = end).
        for to in 0..=n {
            if to >= from && to <= from + seg_len {
                continue;
            }

            let ins_prev = if to == 0 { depot } else { route[to - 1] };
            let ins_next = if to == n { depot } else { route[to] };

            let insertion_cost =
                cost.arc(ins_prev, seg_first) + cost.arc(seg_last, ins_next) - cost.arc(ins_prev, ins_next);

            let delta = insertion_cost - removal_gain;
            if delta < best_delta {
                best_delta = delta;
                best_from = from;
                best_to = to;
            }
        }
    }

    if best_delta < 0 {
        let segment: Vec<usize> = route.drain(best_from..best_from + seg_len).collect();
        let insert_pos = if best_to > best_from {
            best_to - seg_len
        } else {
            best_to
        };
        route.splice(insert_pos..insert_pos, segment);
        true
    } else {
        false
    }
}
