//! Test module for routekit
//!
//! Property-based tests (proptest) for the invariants shared by every
//! strategy, plus end-to-end scenarios run against each strategy.


#[cfg(test)]
pub mod scenario_tests;
