//! # domred - Domain Reduction for Constrained Design Spaces
//!
//! A library for modelling constrained experimental-design domains
//! (continuous and categorical features tied together by linear constraints)
//! and for **algebraic domain reduction**: eliminating continuous variables
//! that are fully determined by linear equality constraints, rewriting the
//! remaining constraints and bounds in the reduced space, and producing an
//! invertible affine mapping between the two coordinate systems.
//!
//! ## Architecture
//!
//! ```text
//! Domain → reduce_domain → (ReducedDomain, AffineTransform)
//!                               │
//!             augment_data / drop_data move tabular data
//!             between original and reduced coordinates
//! ```
//!
//! ## Example
//!
//! ```rust
//! use domred::prelude::*;
//!
//! let domain = Domain::new(
//!     vec![
//!         ContinuousFeature::new("x1", 0.1, 1.0).into(),
//!         ContinuousFeature::new("x2", 0.0, 0.8).into(),
//!         ContinuousFeature::new("x3", 0.3, 0.9).into(),
//!     ],
//!     vec![Constraint::linear_equality(
//!         ["x1", "x2", "x3"],
//!         [1.0, 1.0, 1.0],
//!         1.0,
//!     )],
//! )?;
//!
//! let (reduced, transform) = reduce_domain(&domain)?;
//! assert_eq!(transform.equalities.len(), 1);
//! assert_eq!(reduced.features().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod reduce;
pub mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types and functions.

    pub use crate::domain::{
        CategoricalFeature, Constraint, ContinuousFeature, Domain, Feature, LinearConstraint,
        NChooseKConstraint,
    };
    pub use crate::reduce::{
        check_domain_for_reduction, reduce_domain, reduce_domain_with_tolerance, AffineTransform,
        Substitution,
    };
    pub use crate::utils::errors::{DomainError, ReduceError, TableError};
    pub use crate::utils::linalg::{check_existence_of_solution, rref, DEFAULT_TOL};
    pub use crate::utils::table::{Column, DataTable};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
