//! Optimizer configuration.
//!
//! All fields have defaults, so a JSON document only needs the values it
//! overrides:
//!
//! ```
//! use u_route_optimizer::config::OptimizerConfig;
//!
//! let config = OptimizerConfig::from_json_str(r#"{ "time_budget_seconds": 2.0 }"#).unwrap();
//! assert_eq!(config.time_budget_seconds, 2.0);
//! assert_eq!(config.max_penalty_rounds, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::assembly::DEFAULT_AVERAGE_SPEED_KMH;
use crate::constructive::ConstructionStrategy;
use crate::error::{InvalidInput, Result};

/// Configuration for a single optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Wall-clock budget for local search, in seconds. Zero skips it.
    pub time_budget_seconds: f64,
    /// Speed used to estimate driving time.
    pub average_speed_kmh: f64,
    /// Guided local search penalty rounds before the search stops.
    pub max_penalty_rounds: u32,
    /// Cost charged per edge of the tour, in meters.
    pub span_cost_coefficient: i64,
    /// Scales the guided local search penalty weight.
    pub lambda_coefficient: f64,
    /// Optional cap on improvement passes. Makes runs reproducible.
    pub max_iterations: Option<u64>,
    /// Longest depot-closed route a single vehicle may drive. `None`
    /// disables the check.
    pub max_vehicle_distance_meters: Option<i64>,
    /// Heuristic that builds the initial tour.
    pub construction: ConstructionStrategy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            time_budget_seconds: 5.0,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            max_penalty_rounds: 100,
            span_cost_coefficient: 100,
            lambda_coefficient: 0.1,
            max_iterations: None,
            max_vehicle_distance_meters: Some(300_000),
            construction: ConstructionStrategy::CheapestInsertion,
        }
    }
}

impl OptimizerConfig {
    /// Fast configuration for interactive use
    /// - One second of search
    /// - Fewer penalty rounds
    pub fn fast() -> Self {
        Self {
            time_budget_seconds: 1.0,
            max_penalty_rounds: 30,
            ..Self::default()
        }
    }

    /// Quality configuration for background processing
    /// - Thirty seconds of search
    /// - Many more penalty rounds
    pub fn quality() -> Self {
        Self {
            time_budget_seconds: 30.0,
            max_penalty_rounds: 1_000,
            ..Self::default()
        }
    }

    /// Reproducible configuration: no wall-clock limit, stops after
    /// `iterations` improvement passes or when the penalty rounds run out.
    pub fn deterministic(iterations: u64) -> Self {
        Self {
            time_budget_seconds: f64::INFINITY,
            max_iterations: Some(iterations),
            ..Self::default()
        }
    }

    /// Parses a JSON document, filling missing fields with defaults, and
    /// validates the result.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> std::result::Result<(), InvalidInput> {
        if self.time_budget_seconds.is_nan() {
            return Err(InvalidInput::InvalidConfig(
                "time_budget_seconds must be a number".to_string(),
            ));
        }
        if !(self.average_speed_kmh.is_finite() && self.average_speed_kmh > 0.0) {
            return Err(InvalidInput::InvalidConfig(format!(
                "average_speed_kmh must be positive, got {}",
                self.average_speed_kmh
            )));
        }
        if self.span_cost_coefficient < 0 {
            return Err(InvalidInput::InvalidConfig(format!(
                "span_cost_coefficient must be non-negative, got {}",
                self.span_cost_coefficient
            )));
        }
        if !(self.lambda_coefficient.is_finite() && self.lambda_coefficient >= 0.0) {
            return Err(InvalidInput::InvalidConfig(format!(
                "lambda_coefficient must be non-negative, got {}",
                self.lambda_coefficient
            )));
        }
        if let Some(max) = self.max_vehicle_distance_meters {
            if max <= 0 {
                return Err(InvalidInput::InvalidConfig(format!(
                    "max_vehicle_distance_meters must be positive, got {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for [`OptimizerPool`](crate::pool::OptimizerPool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Optimizations allowed to run at once.
    pub max_concurrent: usize,
    /// How long a request may wait for a free slot. `None` waits forever.
    pub acquire_timeout_ms: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_concurrent: std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1),
            acquire_timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        assert_eq!(config.time_budget_seconds, 5.0);
        assert_eq!(config.average_speed_kmh, 50.0);
        assert_eq!(config.span_cost_coefficient, 100);
        assert_eq!(config.max_vehicle_distance_meters, Some(300_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let fast = OptimizerConfig::fast();
        let quality = OptimizerConfig::quality();
        assert!(fast.time_budget_seconds < OptimizerConfig::default().time_budget_seconds);
        assert!(quality.max_penalty_rounds > OptimizerConfig::default().max_penalty_rounds);

        let det = OptimizerConfig::deterministic(500);
        assert_eq!(det.max_iterations, Some(500));
        assert!(det.validate().is_ok());
    }

    #[test]
    fn test_json_overrides() {
        let config = OptimizerConfig::from_json_str(
            r#"{ "max_vehicle_distance_meters": null, "construction": "path_cheapest_arc" }"#,
        )
        .expect("valid");
        assert_eq!(config.max_vehicle_distance_meters, None);
        assert_eq!(config.construction, ConstructionStrategy::PathCheapestArc);
        assert_eq!(config.max_penalty_rounds, 100);
    }

    #[test]
    fn test_json_parse_error() {
        let err = OptimizerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, RoutingError::Config(_)));
    }

    #[test]
    fn test_json_rejects_bad_values() {
        let err = OptimizerConfig::from_json_str(r#"{ "average_speed_kmh": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::InvalidInput(InvalidInput::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_span() {
        let config = OptimizerConfig {
            span_cost_coefficient: -1,
            ..OptimizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert!(config.max_concurrent >= 1);
        assert_eq!(config.acquire_timeout_ms, None);
    }
}
