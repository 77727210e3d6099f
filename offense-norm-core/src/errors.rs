//! errors.rs - Custom error types for the offense-norm-core library.
//!
//! Every variant here is raised while a rule catalog is being assembled.
//! Normalization itself has no failure mode, so nothing in this enum can
//! surface from a `normalize` call.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `offense-norm-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NormalizerError {
    #[error("Failed to compile pattern for rule '{rule}': {source}")]
    PatternCompilation {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Rule '{rule}': replacement references non-existent capture group '${group}'")]
    InvalidReplacement { rule: String, group: String },

    #[error("Unknown catalog version '{0}'")]
    UnknownCatalogVersion(String),

    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    #[error("Failed to build catalog, {} rule(s) rejected:\n{}", .0.len(), join_errors(.0))]
    InvalidCatalog(Vec<NormalizerError>),
}

impl NormalizerError {
    /// Collapses a list of build failures into a single error.
    ///
    /// A lone failure is returned as-is so callers can match on it directly.
    pub(crate) fn from_many(mut errors: Vec<NormalizerError>) -> Option<NormalizerError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(NormalizerError::InvalidCatalog(errors)),
        }
    }

    /// The description of the rule that caused this error, when there is exactly one.
    pub fn rule(&self) -> Option<&str> {
        match self {
            NormalizerError::PatternCompilation { rule, .. } => Some(rule),
            NormalizerError::PatternLengthExceeded(rule, _, _) => Some(rule),
            NormalizerError::InvalidReplacement { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

fn join_errors(errors: &[NormalizerError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}
