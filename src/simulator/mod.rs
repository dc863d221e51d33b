//! Headless CPU-vs-CPU balance simulator.
//!
//! Plays batches of matches on the real match loop with both sides driven by
//! the CPU controller, then summarises wins, round outcomes and damage.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_match, MatchStats};
