//! Local search for improving a constructed tour.
//!
//! - [`two_opt`](two_opt_improve) — 2-opt segment reversal
//! - [`or_opt`](or_opt_improve) — Relocation of 1–3 consecutive stops
//! - [`exchange`](exchange_improve) — Pairwise stop swap
//! - [`GuidedLocalSearch`] — Penalty-guided metaheuristic driving the
//!   operators under a [`Termination`]

mod exchange;
mod guided;
mod or_opt;
mod termination;
mod two_opt;

pub use exchange::{exchange_improve, exchange_pass};
pub use guided::{GuidedLocalSearch, SearchOutcome};
pub use or_opt::{or_opt_improve, or_opt_pass, MAX_SEGMENT_LEN};
pub use termination::{SearchClock, StopReason, Termination};
pub use two_opt::{two_opt_improve, two_opt_pass};
