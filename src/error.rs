//! Error types for route optimization.
//!
//! Input problems are reported as [`RoutingError::InvalidInput`] with a
//! detailed [`InvalidInput`] reason. A search that runs out of time is not an
//! error: the result carries a [`StopReason`](crate::local_search::StopReason)
//! instead.

use std::time::Duration;

use thiserror::Error;

/// Detailed reasons an optimization request was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    /// No delivery points were supplied.
    #[error("at least one delivery point is required")]
    EmptyDeliveries,
    /// A distance matrix was requested for zero stops.
    #[error("at least one stop (the depot) is required")]
    NoStops,
    /// The vehicle count was zero.
    #[error("number of vehicles must be at least 1, got {0}")]
    InvalidVehicleCount(usize),
    /// Latitude or longitude was non-finite or out of range.
    #[error("invalid coordinate (lat={lat}, lon={lon})")]
    InvalidCoordinate {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
    /// The time budget was not a finite number.
    #[error("time budget must be finite, got {0}")]
    InvalidTimeBudget(f64),
    /// A time window had `ready > due` or non-finite bounds.
    #[error("invalid time window [{ready}, {due}]")]
    InvalidTimeWindow {
        /// Earliest arrival.
        ready: f64,
        /// Latest arrival.
        due: f64,
    },
    /// A tour did not visit every non-depot stop exactly once.
    #[error("invalid tour: {0}")]
    InvalidTour(String),
    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors returned by the route optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// The request was malformed. Not retryable.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    /// No route satisfies the constraints.
    #[error("no feasible solution: {reason}")]
    NoFeasibleSolution {
        /// Human-readable description of the violated constraint.
        reason: String,
    },
    /// The caller cancelled the request before a worker picked it up.
    #[error("optimization cancelled")]
    Cancelled,
    /// No worker became available within the acquisition timeout.
    #[error("no optimizer worker available within {0:?}")]
    PoolTimeout(Duration),
    /// The worker pool was shut down.
    #[error("optimizer pool is closed")]
    PoolClosed,
    /// The blocking worker panicked or was aborted.
    #[error("optimizer worker failed: {0}")]
    Worker(String),
    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

impl From<serde_json::Error> for RoutingError {
    fn from(err: serde_json::Error) -> Self {
        RoutingError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_converts() {
        let err: RoutingError = InvalidInput::EmptyDeliveries.into();
        assert_eq!(err, RoutingError::InvalidInput(InvalidInput::EmptyDeliveries));
        assert_eq!(err.to_string(), "at least one delivery point is required");
    }

    #[test]
    fn test_display_messages() {
        let err = RoutingError::from(InvalidInput::InvalidVehicleCount(0));
        assert_eq!(err.to_string(), "number of vehicles must be at least 1, got 0");

        let err = RoutingError::NoFeasibleSolution {
            reason: "vehicle 2 exceeds budget".to_string(),
        };
        assert!(err.to_string().contains("vehicle 2"));
    }

    #[test]
    fn test_json_error_maps_to_config() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RoutingError::from(parse);
        assert!(matches!(err, RoutingError::Config(_)));
    }
}
