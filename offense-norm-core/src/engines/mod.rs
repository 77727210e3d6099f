//! Concrete implementations of the `Normalizer` trait.
//!
//! * `rule_engine`: applies a compiled catalog through the normalization pipeline.
//! * `memoized`: wraps any normalizer with a cache keyed by the raw input.
//!
//! License: MIT OR APACHE 2.0

pub mod memoized;
pub mod rule_engine;
