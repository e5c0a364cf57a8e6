//! Constraints over domain features.
//!
//! A linear constraint is `Σ coeff_i · x_i = rhs` (equality) or
//! `Σ coeff_i · x_i ≤ rhs` (inequality). Cardinality (n-choose-k)
//! constraints restrict how many of a feature group may be nonzero; they are
//! untouched by linear reduction and pass through it unchanged.

use serde::{Deserialize, Serialize};

/// Shared shape of linear constraints: feature keys, matching coefficients,
/// and a right-hand side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Ordered feature keys the constraint refers to.
    pub features: Vec<String>,
    /// One coefficient per feature key.
    pub coefficients: Vec<f64>,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Create a linear constraint body.
    pub fn new<K: Into<String>>(
        features: impl IntoIterator<Item = K>,
        coefficients: impl IntoIterator<Item = f64>,
        rhs: f64,
    ) -> Self {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            coefficients: coefficients.into_iter().collect(),
            rhs,
        }
    }

    /// Iterate over `(key, coefficient)` pairs.
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.features
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
    }
}

/// A cardinality constraint: between `min_count` and `max_count` of the
/// listed features may take a nonzero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NChooseKConstraint {
    /// The feature group the cardinality applies to.
    pub features: Vec<String>,
    /// Minimum number of active features.
    pub min_count: usize,
    /// Maximum number of active features.
    pub max_count: usize,
    /// Whether an all-zero assignment is also admissible.
    pub none_also_valid: bool,
}

/// A constraint on the domain's features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// `Σ coeff_i · x_i = rhs`
    LinearEquality(LinearConstraint),
    /// `Σ coeff_i · x_i ≤ rhs`
    LinearInequality(LinearConstraint),
    /// Cardinality restriction over a feature group.
    NChooseK(NChooseKConstraint),
}

impl Constraint {
    /// Create a linear equality constraint.
    pub fn linear_equality<K: Into<String>>(
        features: impl IntoIterator<Item = K>,
        coefficients: impl IntoIterator<Item = f64>,
        rhs: f64,
    ) -> Self {
        Constraint::LinearEquality(LinearConstraint::new(features, coefficients, rhs))
    }

    /// Create a linear inequality constraint.
    pub fn linear_inequality<K: Into<String>>(
        features: impl IntoIterator<Item = K>,
        coefficients: impl IntoIterator<Item = f64>,
        rhs: f64,
    ) -> Self {
        Constraint::LinearInequality(LinearConstraint::new(features, coefficients, rhs))
    }

    /// Check if this is a linear equality constraint.
    pub fn is_equality(&self) -> bool {
        matches!(self, Constraint::LinearEquality(_))
    }

    /// Check if this is a linear inequality constraint.
    pub fn is_inequality(&self) -> bool {
        matches!(self, Constraint::LinearInequality(_))
    }

    /// The feature keys this constraint references.
    pub fn feature_keys(&self) -> &[String] {
        match self {
            Constraint::LinearEquality(c) | Constraint::LinearInequality(c) => &c.features,
            Constraint::NChooseK(c) => &c.features,
        }
    }
}
