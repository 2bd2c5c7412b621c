//! Environment services injected into the rules engine.
//!
//! The only ambient dependency of the engine is randomness; it is passed in
//! explicitly rather than read from a global so every rule stays testable.
mod rng;

pub use rng::{PcgRng, RandomSource, SequenceRng, derive_seed};
