//! Compiled rule types and the pattern compiler.
//!
//! License: MIT OR APACHE 2.0

pub mod compiler;

pub use compiler::{
    compile_pattern, validate_replacement, NormalizationRule, RemovalRule, RuleKind, SubstitutionRule,
};
