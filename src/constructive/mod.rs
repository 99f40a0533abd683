//! Constructive heuristics for building the initial tour.
//!
//! - [`cheapest_insertion`] — Greedy cheapest insertion, deterministic
//! - [`path_cheapest_arc`] — Nearest-neighbor path extension, O(n²)

mod cheapest_insertion;
mod path_cheapest_arc;

pub use cheapest_insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::models::Tour;

/// Which heuristic builds the initial tour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStrategy {
    /// See [`cheapest_insertion`].
    #[default]
    CheapestInsertion,
    /// See [`path_cheapest_arc`].
    PathCheapestArc,
}

impl ConstructionStrategy {
    /// Builds an initial tour over `distances` with this strategy.
    pub fn build(self, distances: &DistanceMatrix) -> Result<Tour> {
        match self {
            ConstructionStrategy::CheapestInsertion => cheapest_insertion(distances),
            ConstructionStrategy::PathCheapestArc => path_cheapest_arc(distances),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies_cover_all_stops() {
        let dm = DistanceMatrix::from_data(3, vec![0, 3, 4, 3, 0, 5, 4, 5, 0]).expect("valid");
        for strategy in [
            ConstructionStrategy::CheapestInsertion,
            ConstructionStrategy::PathCheapestArc,
        ] {
            let tour = strategy.build(&dm).expect("feasible");
            assert!(Tour::new(tour.stops().to_vec(), 3).is_ok());
        }
    }

    #[test]
    fn test_strategy_serde_names() {
        let s: ConstructionStrategy =
            serde_json::from_str("\"path_cheapest_arc\"").expect("parse");
        assert_eq!(s, ConstructionStrategy::PathCheapestArc);
    }
}
