//! Model error types.

/// Errors that can occur while building a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Range lookup outside the allocated span.
    IndexOutOfRange { index: usize, count: usize },
    /// Invalid variable bounds.
    InvalidBounds { lower: f64, upper: f64 },
    /// Variable allocation would exceed the u32 id space.
    TooManyVariables { existing: usize, requested: usize },
    /// Batch constraint build: no builder produced a row for a key.
    AmbiguousConstraint { key: String },
    /// Keyed constraint lookup with a key that was never built.
    UnknownConstraintKey { key: String },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::IndexOutOfRange { .. } => "RANGE_INDEX_OUT_OF_BOUNDS",
            ModelError::InvalidBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::TooManyVariables { .. } => "VARIABLE_ID_OVERFLOW",
            ModelError::AmbiguousConstraint { .. } => "CONSTRAINT_AMBIGUOUS",
            ModelError::UnknownConstraintKey { .. } => "CONSTRAINT_UNKNOWN_KEY",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::IndexOutOfRange { index, count } => write!(
                f,
                "[{}] Range index {} out of bounds for {} entities",
                self.code(),
                index,
                count
            ),
            ModelError::InvalidBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::TooManyVariables {
                existing,
                requested,
            } => write!(
                f,
                "[{}] Allocating {} variables on top of {} would overflow the id space",
                self.code(),
                requested,
                existing
            ),
            ModelError::AmbiguousConstraint { key } => write!(
                f,
                "[{}] No constraint builder produced a row for key {}",
                self.code(),
                key
            ),
            ModelError::UnknownConstraintKey { key } => write!(
                f,
                "[{}] Constraint key {} was not part of the build",
                self.code(),
                key
            ),
        }
    }
}

impl std::error::Error for ModelError {}
