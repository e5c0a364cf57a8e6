//! Input features of a design domain.
//!
//! Features form a closed sum type: the reduction engine matches on the
//! variants exhaustively wherever it builds matrices or assembles domains.

use serde::{Deserialize, Serialize};

/// A real-valued input feature with inclusive box bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousFeature {
    /// Unique identifier within a domain.
    pub key: String,
    /// Inclusive lower bound.
    pub lower_bound: f64,
    /// Inclusive upper bound.
    pub upper_bound: f64,
}

impl ContinuousFeature {
    /// Create a continuous feature with the given bounds.
    pub fn new(key: impl Into<String>, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            key: key.into(),
            lower_bound,
            upper_bound,
        }
    }

    /// Copy of this feature with replaced bounds.
    pub fn with_bounds(&self, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            key: self.key.clone(),
            lower_bound,
            upper_bound,
        }
    }

    /// Whether the bounds pin the feature to a single value.
    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

/// An input feature taking one of a finite set of category labels.
///
/// Opaque to the reduction engine; passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalFeature {
    /// Unique identifier within a domain.
    pub key: String,
    /// The admissible category labels.
    pub categories: Vec<String>,
}

impl CategoricalFeature {
    /// Create a categorical feature from its labels.
    pub fn new<L: Into<String>>(
        key: impl Into<String>,
        categories: impl IntoIterator<Item = L>,
    ) -> Self {
        Self {
            key: key.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// An input feature of a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    /// Real-valued feature with box bounds.
    Continuous(ContinuousFeature),
    /// Feature taking one of a finite set of labels.
    Categorical(CategoricalFeature),
}

impl Feature {
    /// The feature's key.
    pub fn key(&self) -> &str {
        match self {
            Feature::Continuous(f) => &f.key,
            Feature::Categorical(f) => &f.key,
        }
    }

    /// Check if this is a continuous feature.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Feature::Continuous(_))
    }

    /// The continuous payload, if any.
    pub fn as_continuous(&self) -> Option<&ContinuousFeature> {
        match self {
            Feature::Continuous(f) => Some(f),
            Feature::Categorical(_) => None,
        }
    }
}

impl From<ContinuousFeature> for Feature {
    fn from(feature: ContinuousFeature) -> Self {
        Feature::Continuous(feature)
    }
}

impl From<CategoricalFeature> for Feature {
    fn from(feature: CategoricalFeature) -> Self {
        Feature::Categorical(feature)
    }
}
