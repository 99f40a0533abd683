//! Route optimizer entry point.
//!
//! Wires the pipeline for one request:
//!
//! 1. Validate the request and build stops (depot = stop 0)
//! 2. Build the haversine distance matrix
//! 3. Construct an initial tour
//! 4. Improve it with guided local search under the time budget
//! 5. Split it across vehicles and check each vehicle's distance budget
//! 6. Assemble the result

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::assembly::ResultAssembler;
use crate::config::OptimizerConfig;
use crate::distance::DistanceMatrix;
use crate::error::{InvalidInput, Result, RoutingError};
use crate::evaluation::check_distance_budget;
use crate::local_search::{GuidedLocalSearch, Termination};
use crate::models::{DeliveryPoint, GeoPoint, OptimizationResult, Stop, VehicleRouteSummary};
use crate::partition::partition;

/// A single optimization request.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
/// use u_route_optimizer::OptimizeRequest;
///
/// let depot = GeoPoint::new(40.7128, -74.0060).unwrap();
/// let request = OptimizeRequest::new(depot, vec![DeliveryPoint::new(depot)])
///     .with_vehicles(2)
///     .with_time_budget(1.5);
/// assert_eq!(request.num_vehicles, 2);
/// assert_eq!(request.time_budget_seconds, Some(1.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Where every vehicle starts and ends.
    pub depot: GeoPoint,
    /// Points to visit, in caller order.
    pub deliveries: Vec<DeliveryPoint>,
    /// Vehicles to split the route across.
    #[serde(default = "default_num_vehicles")]
    pub num_vehicles: usize,
    /// Local search budget in seconds. `None` uses the configured budget.
    #[serde(default)]
    pub time_budget_seconds: Option<f64>,
}

fn default_num_vehicles() -> usize {
    1
}

impl OptimizeRequest {
    /// One vehicle, configured time budget.
    pub fn new(depot: GeoPoint, deliveries: Vec<DeliveryPoint>) -> Self {
        Self {
            depot,
            deliveries,
            num_vehicles: default_num_vehicles(),
            time_budget_seconds: None,
        }
    }

    /// Sets the number of vehicles.
    pub fn with_vehicles(mut self, num_vehicles: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self
    }

    /// Sets the local search budget in seconds.
    pub fn with_time_budget(mut self, seconds: f64) -> Self {
        self.time_budget_seconds = Some(seconds);
        self
    }

    /// Checks the request before any work is done.
    pub fn validate(&self) -> std::result::Result<(), InvalidInput> {
        if self.deliveries.is_empty() {
            return Err(InvalidInput::EmptyDeliveries);
        }
        if self.num_vehicles == 0 {
            return Err(InvalidInput::InvalidVehicleCount(self.num_vehicles));
        }
        if let Some(budget) = self.time_budget_seconds {
            if !budget.is_finite() {
                return Err(InvalidInput::InvalidTimeBudget(budget));
            }
        }
        for tw in self.deliveries.iter().filter_map(DeliveryPoint::time_window) {
            if !tw.is_valid() {
                return Err(InvalidInput::InvalidTimeWindow {
                    ready: tw.ready(),
                    due: tw.due(),
                });
            }
        }
        Ok(())
    }
}

/// One caller-identified vehicle and the deliveries assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSchedule<V> {
    /// Caller's vehicle identifier.
    pub vehicle: V,
    /// The vehicle's route.
    pub route: VehicleRouteSummary,
}

/// Route optimizer with a fixed configuration.
///
/// Holds no state between requests and can be shared across threads.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::config::OptimizerConfig;
/// use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
/// use u_route_optimizer::RouteOptimizer;
///
/// let depot = GeoPoint::new(40.7128, -74.0060).unwrap();
/// let points: Vec<DeliveryPoint> = [(40.7580, -73.9855), (40.7489, -73.9680), (40.6782, -73.9442)]
///     .iter()
///     .map(|&(lat, lon)| DeliveryPoint::new(GeoPoint::new(lat, lon).unwrap()))
///     .collect();
///
/// let optimizer = RouteOptimizer::new(OptimizerConfig::fast());
/// let result = optimizer.optimize_route(depot, &points, 1, 0.5).unwrap();
///
/// let mut seen = result.sequence.clone();
/// seen.sort_unstable();
/// assert_eq!(seen, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    config: OptimizerConfig,
}

impl RouteOptimizer {
    /// Creates an optimizer.
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// The configuration used for every request.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimizes the visiting order of `deliveries` from `depot`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::InvalidInput`] for an empty delivery list, zero
    ///   vehicles, or a non-finite time budget
    /// - [`RoutingError::NoFeasibleSolution`] if a vehicle route exceeds the
    ///   distance budget
    pub fn optimize_route(
        &self,
        depot: GeoPoint,
        deliveries: &[DeliveryPoint],
        num_vehicles: usize,
        time_budget_seconds: f64,
    ) -> Result<OptimizationResult> {
        let request = OptimizeRequest::new(depot, deliveries.to_vec())
            .with_vehicles(num_vehicles)
            .with_time_budget(time_budget_seconds);
        self.optimize(&request, None)
    }

    /// Optimizes a request, stopping early if `cancel` fires.
    ///
    /// A cancelled or timed-out search still returns the best route found so
    /// far; check [`OptimizationResult::is_partial`].
    pub fn optimize(
        &self,
        request: &OptimizeRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<OptimizationResult> {
        let started = Instant::now();
        self.config.validate()?;
        request.validate()?;

        let stops = Stop::from_request(request.depot, &request.deliveries);
        let points: Vec<GeoPoint> = stops.iter().map(Stop::point).collect();
        let distances = DistanceMatrix::from_points(&points)?;

        let initial = self.config.construction.build(&distances)?;
        debug!(
            strategy = ?self.config.construction,
            distance = distances.tour_distance(initial.stops()),
            "initial tour constructed"
        );

        let termination = self.termination(request, cancel);
        let gls = GuidedLocalSearch::new(
            self.config.lambda_coefficient,
            self.config.span_cost_coefficient,
            self.config.max_penalty_rounds,
        );
        let outcome = gls.run(&initial, &distances, &termination);

        let assignment = partition(&outcome.tour, request.num_vehicles)?;
        if let Some(max) = self.config.max_vehicle_distance_meters {
            let violations = check_distance_budget(&assignment, &distances, max);
            if let Some(first) = violations.first() {
                warn!(
                    vehicle_id = first.vehicle_id,
                    distance = first.distance,
                    max_distance = first.max_distance,
                    violations = violations.len(),
                    "vehicle distance budget exceeded"
                );
                return Err(RoutingError::NoFeasibleSolution {
                    reason: format!(
                        "vehicle {} route is {} m, exceeding the {} m limit",
                        first.vehicle_id, first.distance, first.max_distance
                    ),
                });
            }
        }

        let assembler = ResultAssembler::new(self.config.average_speed_kmh);
        let result = assembler.assemble(
            &stops,
            &distances,
            &assignment,
            outcome.stop_reason,
            outcome.stats,
        );

        if result.is_partial() {
            warn!(
                stop_reason = ?result.stop_reason,
                "search cut short, returning best route found"
            );
        }
        info!(
            stops = request.deliveries.len(),
            vehicles = request.num_vehicles,
            distance_km = result.total_distance_km(),
            duration_min = result.estimated_duration_rounded(),
            stop_reason = ?result.stop_reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "route optimized"
        );
        Ok(result)
    }

    /// Optimizes one route and splits it across the given vehicles, pairing
    /// each route with the caller's identifier.
    ///
    /// The last vehicle takes any remainder of the even split.
    pub fn optimize_multi_vehicle_routes<V: Clone>(
        &self,
        depot: GeoPoint,
        deliveries: &[DeliveryPoint],
        vehicle_ids: &[V],
    ) -> Result<Vec<VehicleSchedule<V>>> {
        let request =
            OptimizeRequest::new(depot, deliveries.to_vec()).with_vehicles(vehicle_ids.len());
        let result = self.optimize(&request, None)?;
        Ok(vehicle_ids
            .iter()
            .cloned()
            .zip(result.vehicle_routes)
            .map(|(vehicle, route)| VehicleSchedule { vehicle, route })
            .collect())
    }

    fn termination(
        &self,
        request: &OptimizeRequest,
        cancel: Option<&CancellationToken>,
    ) -> Termination {
        let budget = request
            .time_budget_seconds
            .unwrap_or(self.config.time_budget_seconds);
        let mut termination = Termination::from_seconds(budget);
        if let Some(max) = self.config.max_iterations {
            termination = termination.with_max_iterations(max);
        }
        if let Some(token) = cancel {
            termination = termination.with_cancellation(token.clone());
        }
        termination
    }
}

/// Optimizes a route with [`OptimizerConfig::default`].
///
/// See [`RouteOptimizer::optimize_route`].
pub fn optimize_route(
    depot: GeoPoint,
    deliveries: &[DeliveryPoint],
    num_vehicles: usize,
    time_budget_seconds: f64,
) -> Result<OptimizationResult> {
    RouteOptimizer::default().optimize_route(depot, deliveries, num_vehicles, time_budget_seconds)
}

/// Multi-vehicle optimization with [`OptimizerConfig::default`].
///
/// See [`RouteOptimizer::optimize_multi_vehicle_routes`].
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
/// use u_route_optimizer::optimize_multi_vehicle_routes;
///
/// let depot = GeoPoint::new(40.7128, -74.0060).unwrap();
/// let points: Vec<DeliveryPoint> = (1..=5)
///     .map(|i| DeliveryPoint::new(GeoPoint::new(40.7128 + 0.01 * i as f64, -74.0060).unwrap()))
///     .collect();
/// let schedules = optimize_multi_vehicle_routes(depot, &points, &["van-1", "van-2"]).unwrap();
/// assert_eq!(schedules[0].vehicle, "van-1");
/// assert_eq!(schedules[0].route.delivery_count, 2);
/// assert_eq!(schedules[1].route.delivery_count, 3);
/// ```
pub fn optimize_multi_vehicle_routes<V: Clone>(
    depot: GeoPoint,
    deliveries: &[DeliveryPoint],
    vehicle_ids: &[V],
) -> Result<Vec<VehicleSchedule<V>>> {
    RouteOptimizer::default().optimize_multi_vehicle_routes(depot, deliveries, vehicle_ids)
}
