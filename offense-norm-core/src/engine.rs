// offense-norm-core/src/engine.rs
//! Defines the core `Normalizer` trait.
//!
//! The classification layer only ever talks to this trait, so a plain
//! rule engine and a memoizing wrapper around it are interchangeable.
//!
//! License: MIT OR APACHE 2.0

use crate::catalog::RuleCatalog;
use crate::pipeline::NormalizationPipeline;
use crate::trace::Normalization;

/// A deterministic, infallible text normalizer.
///
/// Implementations must be shareable across threads: a single instance is
/// expected to serve many concurrent callers.
pub trait Normalizer: Send + Sync {
    /// Produces the canonical form of `raw`. Absent input yields `""`.
    fn normalize(&self, raw: Option<&str>) -> String;

    /// Normalizes `raw` and reports every step that changed the text.
    fn explain(&self, raw: Option<&str>) -> Normalization;

    /// The catalog this normalizer applies.
    fn catalog(&self) -> &RuleCatalog;

    /// The pipeline configuration this normalizer applies.
    fn pipeline(&self) -> &NormalizationPipeline;

    /// Normalizes every element of `inputs`, preserving order.
    fn normalize_all(&self, inputs: &[Option<&str>]) -> Vec<String> {
        inputs.iter().map(|raw| self.normalize(*raw)).collect()
    }
}
