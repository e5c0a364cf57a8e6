//! Error types for the domain model and the reduction engine.
//!
//! Errors are organized by the layer that produces them: domain validation,
//! the reduction algorithm itself, and tabular data movement.

use thiserror::Error;

/// Validation errors raised while constructing a [`crate::domain::Domain`].
///
/// Malformed constraints fail fast here; the reduction engine never
/// silently zero-fills unknown feature references.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Two features share the same key.
    #[error("duplicate feature key `{0}`")]
    DuplicateKey(String),

    /// A continuous feature has a lower bound above its upper bound.
    #[error("feature `{key}` has empty bounds [{lower}, {upper}]")]
    EmptyBounds {
        /// Key of the offending feature.
        key: String,
        /// Lower bound as given.
        lower: f64,
        /// Upper bound as given.
        upper: f64,
    },

    /// A linear constraint lists a different number of features and
    /// coefficients.
    #[error("constraint lists {features} feature keys but {coefficients} coefficients")]
    CoefficientMismatch {
        /// Number of feature keys in the constraint.
        features: usize,
        /// Number of coefficients in the constraint.
        coefficients: usize,
    },

    /// A constraint references a feature key absent from the domain.
    #[error("constraint references unknown feature `{0}`")]
    UnknownFeature(String),

    /// A linear constraint references a feature that is not continuous.
    #[error("linear constraint references non-continuous feature `{0}`")]
    NotContinuous(String),
}

/// Errors raised by [`crate::reduce::reduce_domain`].
#[derive(Error, Debug)]
pub enum ReduceError {
    /// No point satisfies the linear equality constraints together with the
    /// feature bounds. Always fatal: no partial reduction is returned.
    #[error("infeasible constraint system: {0}")]
    InfeasibleConstraintSystem(String),

    /// The input domain, or the assembled reduced domain, failed validation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors raised by [`crate::utils::table::DataTable`] operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// A referenced column does not exist in the table.
    #[error("column `{0}` not found")]
    MissingColumn(String),

    /// A column holds text data where numeric data was required.
    #[error("column `{0}` is not numeric")]
    NotNumeric(String),

    /// An inserted column does not match the table's row count.
    #[error("column `{name}` has {len} rows, expected {expected}")]
    LengthMismatch {
        /// Name of the inserted column.
        name: String,
        /// Row count of the inserted column.
        len: usize,
        /// Row count of the table.
        expected: usize,
    },
}
