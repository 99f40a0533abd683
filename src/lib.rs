//! # u-route-optimizer
//!
//! Delivery route optimization: orders a set of delivery points around a
//! depot to minimize driving distance, then optionally splits the route
//! across several vehicles under a per-vehicle distance budget.
//!
//! ## Pipeline
//!
//! haversine distance matrix → cheapest insertion → guided local search
//! (2-opt, or-opt, exchange) under a time budget → even split across
//! vehicles → result assembly.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (GeoPoint, DeliveryPoint, Stop, Tour, OptimizationResult)
//! - [`distance`] — Haversine distance and integer distance matrix
//! - [`constructive`] — Constructive heuristics (Cheapest Insertion, Path Cheapest Arc)
//! - [`local_search`] — Move operators and guided local search
//! - [`evaluation`] — Tour cost and distance budget checks
//! - [`partition`] — Multi-vehicle split of a tour
//! - [`assembly`] — Result assembly (distance, duration, polyline)
//! - [`optimizer`] — The [`RouteOptimizer`] entry point
//! - [`pool`] — Bounded async worker pool
//! - [`config`] — Optimizer and pool configuration
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use u_route_optimizer::models::{DeliveryPoint, GeoPoint};
//! use u_route_optimizer::optimize_route;
//!
//! let depot = GeoPoint::new(40.7128, -74.0060).unwrap();
//! let points: Vec<DeliveryPoint> = [(40.7580, -73.9855), (40.7489, -73.9680), (40.6782, -73.9442)]
//!     .iter()
//!     .map(|&(lat, lon)| DeliveryPoint::new(GeoPoint::new(lat, lon).unwrap()))
//!     .collect();
//!
//! let result = optimize_route(depot, &points, 1, 0.5).unwrap();
//! assert_eq!(result.sequence.len(), 3);
//! assert_eq!(result.polyline.first(), result.polyline.last());
//! println!("{} km, {} min", result.total_distance_km(), result.estimated_duration_rounded());
//! ```

pub mod assembly;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod optimizer;
pub mod partition;
pub mod pool;

pub use config::{OptimizerConfig, PoolConfig};
pub use error::{InvalidInput, Result, RoutingError};
pub use optimizer::{
    optimize_multi_vehicle_routes, optimize_route, OptimizeRequest, RouteOptimizer,
    VehicleSchedule,
};
