// offense-norm-core/src/lib.rs
//! # Offense Norm Core Library
//!
//! `offense-norm-core` canonicalizes free-text criminal offense descriptions
//! ("W/O LIC", "CSC 2ND DEG", "POSS CS SCH II") into a normalized surface form
//! so that semantically identical offenses collapse to the same string before
//! they reach a text classifier.
//!
//! The heart of the crate is a rule-ordered rewriting engine. Rules come in two
//! kinds, substitutions and removals, and their interaction order is the whole
//! game: a substitution's output is the next rule's input, so the catalog fixes
//! an explicit execution order once, at build time.
//!
//! ## Modules
//!
//! * `config`: Plain rule definitions, the versioned catalog document, and pipeline settings.
//! * `rules`: The pattern compiler and the compiled rule variants.
//! * `catalog`: The immutable, ordered `RuleCatalog` and its process-wide build cache.
//! * `pipeline`: The staged normalization pipeline.
//! * `trace`: Step-by-step reports of what a normalization changed.
//! * `engine`: Defines the `Normalizer` trait.
//! * `engines`: The rule engine and the memoizing wrapper.
//! * `headless`: Function-level entry points.
//! * `errors`: Catalog construction errors.
//!
//! ## Usage Example
//!
//! ```rust
//! use offense_norm_core::{catalog_for_version, normalize};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Build (or fetch from cache) the default catalog once.
//!     let catalog = catalog_for_version(None)?;
//!
//!     // 2. Normalize records against it; this never fails.
//!     let out = normalize(Some("DRIVING W/O  LIC."), &catalog);
//!     assert_eq!(out, "driving without license");
//!
//!     // Absent input is not an error.
//!     assert_eq!(normalize(None, &catalog), "");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Only catalog construction can fail, with a [`NormalizerError`]. A malformed
//! rule fails the whole build and is named in the error. Normalization itself is
//! a total function.
//!
//! ## Concurrency
//!
//! A built [`RuleCatalog`] is read-only and `Send + Sync`; share it through an
//! `Arc` across any number of threads without locking.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod catalog;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod pipeline;
pub mod rules;
pub mod trace;

/// Re-exports the rule definition records and configuration types.
pub use config::{
    merge_definitions,
    CatalogSource,
    NormalizerConfig,
    PipelineConfig,
    RemovalDefinition,
    RuleDefinitions,
    SubstitutionDefinition,
    DEFAULT_PRIORITY,
    DEFAULT_PUNCTUATION,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::NormalizerError;

/// Re-exports the compiled catalog and its cache helpers.
pub use catalog::{catalog_for_version, default_catalog, get_or_build_catalog, RuleCatalog};

/// Re-exports the compiled rule types.
pub use rules::{compile_pattern, NormalizationRule, RemovalRule, RuleKind, SubstitutionRule};

pub use pipeline::NormalizationPipeline;

pub use trace::{Normalization, Stage, TraceEvent};

/// Re-exports the `Normalizer` trait and its implementations.
pub use engine::Normalizer;
pub use engines::memoized::{InMemoryStore, MemoStats, MemoStore, MemoizedNormalizer};
pub use engines::rule_engine::RuleEngine;

/// Re-exports the function-level entry points.
pub use headless::{build_catalog, headless_normalize_string, normalize};
