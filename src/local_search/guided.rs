//! Guided Local Search (GLS) over a single depot-closed tour.
//!
//! GLS repeats a descent with 2-opt, or-opt and exchange moves. Each time
//! the descent reaches a local optimum, the edges of that tour are penalized
//! so the next descent is pushed away from them. Moves are accepted on the
//! augmented cost
//!
//! ```text
//! c'(i, j) = d(i, j) + λ · penalty(i, j)
//! ```
//!
//! Every edge of each local optimum is credited one usage. The edges with
//! the highest utility `d(i, j) · usage(i, j) / (1 + penalty(i, j))` have
//! their penalty raised by one, so frequently recurring long edges are
//! penalized first. `λ` is fixed after the first local optimum as
//! `lambda_coefficient · distance / edges`, at least 1.
//!
//! The best tour under the real cost is kept throughout, so the outcome is
//! never worse than the initial tour. The best tour then gets a final
//! penalty-free descent on the same deadline and cancellation token, so a
//! search that already ran out of time returns the best tour as found.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//! application to the traveling salesman problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use std::time::Instant;

use tracing::debug;

use super::exchange::exchange_pass;
use super::or_opt::or_opt_pass;
use super::termination::{SearchClock, StopReason, Termination};
use super::two_opt::two_opt_pass;
use crate::distance::{ArcCost, DistanceMatrix};
use crate::evaluation::TourEvaluator;
use crate::models::{SearchStats, Tour};

/// Passes allowed for the final penalty-free descent. The deadline and
/// cancellation still apply.
const POLISH_PASS_LIMIT: u64 = 10_000;

/// Dense per-edge counters, kept symmetric.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EdgeCounts {
    data: Vec<u32>,
    size: usize,
}

impl EdgeCounts {
    fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    #[inline]
    fn get(&self, from: usize, to: usize) -> u32 {
        self.data[from * self.size + to]
    }

    fn increment(&mut self, from: usize, to: usize) {
        let forward = from * self.size + to;
        self.data[forward] = self.data[forward].saturating_add(1);
        if from != to {
            let backward = to * self.size + from;
            self.data[backward] = self.data[backward].saturating_add(1);
        }
    }
}

/// Distances augmented with GLS penalties.
struct PenalizedCost<'a> {
    distances: &'a DistanceMatrix,
    penalties: &'a EdgeCounts,
    lambda: i64,
}

impl ArcCost for PenalizedCost<'_> {
    #[inline]
    fn arc(&self, from: usize, to: usize) -> i64 {
        self.distances.get(from, to) + self.lambda * i64::from(self.penalties.get(from, to))
    }
}

/// What the improver returns.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best tour found.
    pub tour: Tour,
    /// Why the search stopped.
    pub stop_reason: StopReason,
    /// Search counters.
    pub stats: SearchStats,
}

/// Guided local search controller.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::distance::DistanceMatrix;
/// use u_route_optimizer::local_search::{GuidedLocalSearch, Termination};
/// use u_route_optimizer::models::Tour;
///
/// let dm = DistanceMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let initial = Tour::new(vec![2, 1, 3], 4).unwrap();
/// let gls = GuidedLocalSearch::new(0.1, 0, 10);
/// let outcome = gls.run(&initial, &dm, &Termination::new().with_max_iterations(1_000));
/// assert_eq!(dm.tour_distance(outcome.tour.stops()), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GuidedLocalSearch {
    lambda_coefficient: f64,
    evaluator: TourEvaluator,
    max_penalty_rounds: u32,
}

impl GuidedLocalSearch {
    /// Creates a controller.
    ///
    /// * `lambda_coefficient` — scales the penalty weight λ
    /// * `span_cost_coefficient` — per-edge span cost added to tour cost
    /// * `max_penalty_rounds` — penalty rounds before the search stops
    pub fn new(lambda_coefficient: f64, span_cost_coefficient: i64, max_penalty_rounds: u32) -> Self {
        Self {
            lambda_coefficient,
            evaluator: TourEvaluator::new(span_cost_coefficient),
            max_penalty_rounds,
        }
    }

    /// Improves `initial` until `termination` or the penalty round cap stops
    /// the search.
    pub fn run(
        &self,
        initial: &Tour,
        distances: &DistanceMatrix,
        termination: &Termination,
    ) -> SearchOutcome {
        let started = Instant::now();
        let initial_cost = self.evaluator.cost(initial.stops(), distances);
        let mut stats = SearchStats {
            initial_cost,
            final_cost: initial_cost,
            ..SearchStats::default()
        };

        if termination.is_skipped() {
            return SearchOutcome {
                tour: initial.clone(),
                stop_reason: StopReason::Skipped,
                stats,
            };
        }
        if initial.len() < 2 {
            return SearchOutcome {
                tour: initial.clone(),
                stop_reason: StopReason::Converged,
                stats,
            };
        }

        let n = distances.size();
        let mut penalties = EdgeCounts::new(n);
        let mut usage = EdgeCounts::new(n);
        let mut lambda = 0;

        let mut current = initial.stops().to_vec();
        let mut best = current.clone();
        let mut best_cost = initial_cost;

        let mut clock = termination.start();
        let mut stop_reason = loop {
            let arcs = PenalizedCost {
                distances,
                penalties: &penalties,
                lambda,
            };
            let interrupted = descend(&mut current, &arcs, &mut clock, &mut stats).err();

            let cost = self.evaluator.cost(&current, distances);
            if cost < best_cost {
                best_cost = cost;
                best.clone_from(&current);
            }
            if let Some(reason) = interrupted {
                break reason;
            }
            if stats.penalty_rounds >= self.max_penalty_rounds {
                break StopReason::PenaltyRoundsExhausted;
            }

            if lambda == 0 {
                lambda = self.lambda(distances.tour_distance(&current), current.len() + 1);
            }
            let penalized = penalize(&current, distances, &mut penalties, &mut usage);
            stats.penalty_rounds += 1;
            debug!(
                round = stats.penalty_rounds,
                cost,
                best_cost,
                lambda,
                penalized,
                "gls penalty round"
            );
        };
        stats.iterations = clock.iterations();

        let mut polish = clock.follow_up(POLISH_PASS_LIMIT);
        if let Err(reason @ (StopReason::TimeLimit | StopReason::Cancelled)) =
            descend(&mut best, distances, &mut polish, &mut stats)
        {
            stop_reason = reason;
        }
        stats.iterations += polish.iterations();
        best_cost = self.evaluator.cost(&best, distances);

        stats.final_cost = best_cost;
        stats.elapsed = started.elapsed();
        debug!(
            ?stop_reason,
            initial_cost,
            final_cost = best_cost,
            iterations = stats.iterations,
            "guided local search finished"
        );

        SearchOutcome {
            tour: Tour::from_permutation(best),
            stop_reason,
            stats,
        }
    }

    fn lambda(&self, distance: i64, edges: usize) -> i64 {
        let raw = self.lambda_coefficient * distance as f64 / edges.max(1) as f64;
        if raw.is_finite() {
            (raw.round() as i64).max(1)
        } else {
            1
        }
    }
}

/// Runs all operators until none improves `route`, checking `clock` before
/// every pass.
///
/// Returns `Err` with the stop reason if a limit fired first.
pub(crate) fn descend<C: ArcCost>(
    route: &mut Vec<usize>,
    arcs: &C,
    clock: &mut SearchClock<'_>,
    stats: &mut SearchStats,
) -> Result<(), StopReason> {
    loop {
        let mut moves = 0;

        clock.check()?;
        moves += two_opt_pass(route, 0, arcs);
        clock.tick();

        clock.check()?;
        moves += or_opt_pass(route, 0, arcs);
        clock.tick();

        clock.check()?;
        moves += exchange_pass(route, 0, arcs);
        clock.tick();

        stats.improving_moves += moves;
        if moves == 0 {
            return Ok(());
        }
    }
}

/// Credits usage to every edge of `route` and raises the penalty of the
/// maximum-utility edges. Returns how many edges were penalized.
fn penalize(
    route: &[usize],
    distances: &DistanceMatrix,
    penalties: &mut EdgeCounts,
    usage: &mut EdgeCounts,
) -> usize {
    let edges = closed_edges(route);
    for &(a, b) in &edges {
        usage.increment(a, b);
    }

    const EPSILON: f64 = 1e-9;
    let mut max_utility = f64::NEG_INFINITY;
    let mut candidates: Vec<(usize, usize)> = Vec::new();

    for &(a, b) in &edges {
        let feature_cost = distances.get(a, b) as f64 * f64::from(usage.get(a, b));
        let utility = feature_cost / (1.0 + f64::from(penalties.get(a, b)));
        if utility > max_utility + EPSILON {
            max_utility = utility;
            candidates.clear();
            candidates.push((a, b));
        } else if (utility - max_utility).abs() < EPSILON {
            candidates.push((a, b));
        }
    }

    for &(a, b) in &candidates {
        penalties.increment(a, b);
    }
    candidates.len()
}

/// Edges of the depot-closed tour over `route`.
fn closed_edges(route: &[usize]) -> Vec<(usize, usize)> {
    let mut edges = Vec::with_capacity(route.len() + 1);
    let mut prev = 0;
    for &s in route {
        edges.push((prev, s));
        prev = s;
    }
    if !route.is_empty() {
        edges.push((prev, 0));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Points on a small grid with rectilinear distances, depot in the
    /// corner.
    fn grid(side: i64) -> DistanceMatrix {
        let pts: Vec<(i64, i64)> = (0..side).flat_map(|x| (0..side).map(move |y| (x, y))).collect();
        let mut dm = DistanceMatrix::new(pts.len());
        for (i, a) in pts.iter().enumerate() {
            for (j, b) in pts.iter().enumerate() {
                dm.set(i, j, 10 * ((a.0 - b.0).abs() + (a.1 - b.1).abs()));
            }
        }
        dm
    }

    fn reversed_tour(n: usize) -> Tour {
        Tour::new((1..n).rev().collect(), n).expect("valid")
    }

    fn zigzag_tour(n: usize) -> Tour {
        let mut stops: Vec<usize> = (1..n).step_by(2).collect();
        stops.extend((2..n).step_by(2));
        Tour::new(stops, n).expect("valid")
    }

    #[test]
    fn test_skipped_returns_initial() {
        let dm = grid(3);
        let initial = zigzag_tour(9);
        let gls = GuidedLocalSearch::new(0.1, 100, 100);
        let outcome = gls.run(&initial, &dm, &Termination::from_seconds(0.0));
        assert_eq!(outcome.tour, initial);
        assert_eq!(outcome.stop_reason, StopReason::Skipped);
        assert_eq!(outcome.stats.iterations, 0);
    }

    #[test]
    fn test_single_stop_is_noop() {
        let dm = DistanceMatrix::from_data(2, vec![0, 10, 10, 0]).expect("valid");
        let initial = Tour::new(vec![1], 2).expect("valid");
        let gls = GuidedLocalSearch::new(0.1, 100, 100);
        let outcome = gls.run(&initial, &dm, &Termination::from_seconds(1.0));
        assert_eq!(outcome.tour.stops(), &[1]);
        assert_eq!(outcome.stop_reason, StopReason::Converged);
    }

    #[test]
    fn test_never_worse_than_initial() {
        let dm = grid(4);
        let initial = zigzag_tour(16);
        let eval = TourEvaluator::new(100);
        let gls = GuidedLocalSearch::new(0.1, 100, 20);
        let outcome = gls.run(&initial, &dm, &Termination::new().with_max_iterations(500));
        assert!(eval.cost(outcome.tour.stops(), &dm) <= eval.cost(initial.stops(), &dm));
        assert_eq!(outcome.stats.final_cost, eval.cost(outcome.tour.stops(), &dm));
        assert!(Tour::new(outcome.tour.stops().to_vec(), 16).is_ok());
    }

    #[test]
    fn test_reaches_grid_optimum() {
        // A 3x3 grid with spacing 10 has an optimal closed tour of 100.
        let dm = grid(3);
        let gls = GuidedLocalSearch::new(0.1, 0, 50);
        let outcome = gls.run(&zigzag_tour(9), &dm, &Termination::from_seconds(2.0));
        assert_eq!(dm.tour_distance(outcome.tour.stops()), 100);
        assert_eq!(outcome.stop_reason, StopReason::PenaltyRoundsExhausted);
        assert_eq!(outcome.stats.penalty_rounds, 50);
    }

    #[test]
    fn test_iteration_limit_is_deterministic() {
        let dm = grid(4);
        let gls = GuidedLocalSearch::new(0.1, 100, 1_000);
        let termination = Termination::new().with_max_iterations(60);
        let a = gls.run(&reversed_tour(16), &dm, &termination);
        let b = gls.run(&reversed_tour(16), &dm, &termination);
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.stop_reason, StopReason::IterationLimit);
        assert_eq!(a.stats.final_cost, b.stats.final_cost);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let dm = grid(3);
        let initial = zigzag_tour(9);
        let gls = GuidedLocalSearch::new(0.1, 100, 100);
        let outcome = gls.run(&initial, &dm, &Termination::new().with_cancellation(token));
        assert_eq!(outcome.stop_reason, StopReason::Cancelled);
        assert_eq!(outcome.tour, initial);
        assert!(outcome.stop_reason.is_partial());
    }

    #[test]
    fn test_final_tour_is_local_optimum() {
        let dm = grid(4);
        let gls = GuidedLocalSearch::new(0.1, 0, 10);
        let outcome = gls.run(&zigzag_tour(16), &dm, &Termination::from_seconds(2.0));
        assert_eq!(outcome.stop_reason, StopReason::PenaltyRoundsExhausted);
        let mut route = outcome.tour.stops().to_vec();
        assert_eq!(two_opt_pass(&mut route, 0, &dm), 0);
        assert_eq!(or_opt_pass(&mut route, 0, &dm), 0);
        assert_eq!(exchange_pass(&mut route, 0, &dm), 0);
    }

    /// Random points in a 20 km square, Euclidean meters.
    fn scattered(n: usize, seed: u64) -> DistanceMatrix {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let pts: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..20_000.0), rng.random_range(0.0..20_000.0)))
            .collect();
        let mut dm = DistanceMatrix::new(n);
        for (i, a) in pts.iter().enumerate() {
            for (j, b) in pts.iter().enumerate() {
                dm.set(i, j, (a.0 - b.0).hypot(a.1 - b.1).round() as i64);
            }
        }
        dm
    }

    #[test]
    fn test_deadline_bounds_large_search() {
        let dm = scattered(501, 17);
        let initial = crate::constructive::cheapest_insertion(&dm).expect("feasible");
        let gls = GuidedLocalSearch::new(0.1, 100, u32::MAX);

        let started = Instant::now();
        let outcome = gls.run(&initial, &dm, &Termination::from_seconds(0.1));
        let elapsed = started.elapsed();

        assert!(elapsed < std::time::Duration::from_secs(1), "took {elapsed:?}");
        assert_eq!(outcome.stop_reason, StopReason::TimeLimit);
        assert!(outcome.stop_reason.is_partial());
        assert!(Tour::new(outcome.tour.stops().to_vec(), 501).is_ok());
        assert!(outcome.stats.final_cost <= outcome.stats.initial_cost);
    }

    #[test]
    fn test_cancel_during_search() {
        let dm = scattered(301, 5);
        let initial = reversed_tour(301);
        let token = tokio_util::sync::CancellationToken::new();
        let termination = Termination::from_seconds(60.0).with_cancellation(token.clone());
        let gls = GuidedLocalSearch::new(0.1, 100, u32::MAX);

        let canceller = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            token.cancel();
        });
        let started = Instant::now();
        let outcome = gls.run(&initial, &dm, &termination);
        let elapsed = started.elapsed();
        canceller.join().expect("canceller thread");

        assert_eq!(outcome.stop_reason, StopReason::Cancelled);
        assert!(elapsed < std::time::Duration::from_secs(5), "took {elapsed:?}");
        assert!(Tour::new(outcome.tour.stops().to_vec(), 301).is_ok());
    }

    #[test]
    fn test_penalize_hits_longest_edge() {
        let dm = DistanceMatrix::from_data(3, vec![0, 1, 9, 1, 0, 2, 9, 2, 0]).expect("valid");
        let mut penalties = EdgeCounts::new(3);
        let mut usage = EdgeCounts::new(3);
        let count = penalize(&[1, 2], &dm, &mut penalties, &mut usage);
        assert_eq!(count, 1);
        assert_eq!(penalties.get(2, 0), 1);
        assert_eq!(penalties.get(0, 2), 1);
        assert_eq!(penalties.get(0, 1), 0);
        assert_eq!(usage.get(1, 2), 1);
    }

    #[test]
    fn test_closed_edges() {
        assert_eq!(closed_edges(&[3, 1]), vec![(0, 3), (3, 1), (1, 0)]);
        assert!(closed_edges(&[]).is_empty());
    }
}
