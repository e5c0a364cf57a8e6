//! Design domains: an ordered feature list plus an ordered constraint list.
//!
//! A [`Domain`] is an immutable value. The reduction engine never edits a
//! domain in place; it always assembles a new one through [`Domain::new`],
//! which re-runs the full validation.

pub mod constraint;
pub mod feature;

pub use constraint::{Constraint, LinearConstraint, NChooseKConstraint};
pub use feature::{CategoricalFeature, ContinuousFeature, Feature};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::errors::DomainError;

/// A constrained design space over continuous and categorical features.
///
/// Invariants, enforced at construction:
/// - feature keys are unique,
/// - continuous bounds are non-empty (`lower ≤ upper`),
/// - linear constraints carry one coefficient per feature key,
/// - every key referenced by a constraint exists in the domain,
/// - linear constraints reference only continuous features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    features: Vec<Feature>,
    constraints: Vec<Constraint>,
}

impl Domain {
    /// Create a validated domain from features and constraints.
    pub fn new(features: Vec<Feature>, constraints: Vec<Constraint>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for feature in &features {
            if !seen.insert(feature.key()) {
                return Err(DomainError::DuplicateKey(feature.key().to_string()));
            }
            if let Feature::Continuous(c) = feature {
                if c.lower_bound > c.upper_bound {
                    return Err(DomainError::EmptyBounds {
                        key: c.key.clone(),
                        lower: c.lower_bound,
                        upper: c.upper_bound,
                    });
                }
            }
        }

        let continuous: HashSet<&str> = features
            .iter()
            .filter_map(|f| f.as_continuous().map(|c| c.key.as_str()))
            .collect();

        for constraint in &constraints {
            match constraint {
                Constraint::LinearEquality(c) | Constraint::LinearInequality(c) => {
                    if c.features.len() != c.coefficients.len() {
                        return Err(DomainError::CoefficientMismatch {
                            features: c.features.len(),
                            coefficients: c.coefficients.len(),
                        });
                    }
                    for key in &c.features {
                        if !seen.contains(key.as_str()) {
                            return Err(DomainError::UnknownFeature(key.clone()));
                        }
                        if !continuous.contains(key.as_str()) {
                            return Err(DomainError::NotContinuous(key.clone()));
                        }
                    }
                }
                Constraint::NChooseK(c) => {
                    for key in &c.features {
                        if !seen.contains(key.as_str()) {
                            return Err(DomainError::UnknownFeature(key.clone()));
                        }
                    }
                }
            }
        }

        Ok(Self {
            features,
            constraints,
        })
    }

    /// The features in domain order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The constraints in domain order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Look up a feature by key.
    pub fn feature(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key() == key)
    }

    /// Iterate over the continuous features in domain order.
    pub fn continuous(&self) -> impl Iterator<Item = &ContinuousFeature> {
        self.features.iter().filter_map(Feature::as_continuous)
    }

    /// Continuous-feature keys in domain order.
    pub fn continuous_keys(&self) -> Vec<&str> {
        self.continuous().map(|f| f.key.as_str()).collect()
    }
}
