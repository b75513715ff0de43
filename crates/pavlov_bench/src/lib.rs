//! pavlov_bench — trajectory tests for canonical conditioning protocols.
//!
//! Validates the qualitative behavior of the model over whole experiments:
//! - Acquisition saturates Fear and Persistent weights
//! - Extinction suppresses Fear while the Persistent trace survives
//! - Rest and US-only trials leave associations untouched
//! - Reacquisition after extinction is faster than first acquisition ("savings")

use pavlov_core::{compile_with, simulate, ModelParameters, ModelState, Schedule};

/// Compile `notation` with a fixed seed and run it from a fresh state.
pub fn run_protocol(params: ModelParameters, notation: &str, seed: u64) -> (Schedule, ModelState) {
    let schedule = match compile_with(notation, 0.5, seed) {
        Ok(schedule) => schedule,
        Err(e) => panic!("protocol {notation:?} does not compile: {e}"),
    };
    let state = simulate(params, &schedule);
    (schedule, state)
}
