//! Tour cost evaluation and distance budget checking.

mod evaluator;

pub use evaluator::{check_distance_budget, BudgetViolation, TourEvaluator};
