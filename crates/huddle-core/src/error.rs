//! Engine error taxonomy.
//!
//! Three buckets: `NotFound` for missing aggregates (propagated, never
//! recovered), `Validation` for rejected inputs, and `Internal` for any other
//! collaborator failure. Batch generation converts per-date errors of every
//! bucket into skip-reason strings; only a failed preview escapes it.

use thiserror::Error;

/// Errors produced by the generation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced aggregate does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The request was well-formed but rejected.
    #[error("{0}")]
    Validation(String),

    /// A collaborator failed in a way the engine cannot interpret.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Whether this error is the NotFound bucket.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error is the Validation bucket.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = EngineError::NotFound("recurrence 42".to_string());
        assert_eq!(err.to_string(), "recurrence 42 not found");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_display_is_bare_message() {
        let err = EngineError::Validation("date outside season".to_string());
        assert_eq!(err.to_string(), "date outside season");
        assert!(err.is_validation());
    }

    #[test]
    fn internal_wraps_anyhow() {
        let err: EngineError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.to_string(), "connection reset");
        assert!(!err.is_not_found());
    }
}
