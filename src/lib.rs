//! Adaptive Traffic Light Library
//!
//! Simulates a single intersection whose light timing adapts to observed
//! traffic, usable headless from the bundled binary or embedded in tests.

pub mod control;
