//! State module for tracking run progress
//!
//! - `RunPhase`: where a run currently is (discovering, fetching books, emitting, ...)

mod run_phase;

pub use run_phase::RunPhase;
