//! Affine substitution records and the bidirectional data transform.
//!
//! Reduction expresses each eliminated variable as an affine function of the
//! surviving free variables. The collected substitutions form an
//! [`AffineTransform`], the serializable artifact downstream code uses to
//! move tabular data between the original and reduced coordinate spaces.

use serde::{Deserialize, Serialize};

use crate::utils::errors::TableError;
use crate::utils::table::{Column, DataTable};

/// One eliminated variable expressed as an affine function of free variables:
/// `x_key = intercept + Σ coefficients[j] · x_free_keys[j]`.
///
/// `coefficients` holds one entry per free key followed by the intercept,
/// so its length is always `free_keys.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    /// Key of the eliminated variable.
    pub key: String,
    /// Free variables with nonzero contribution, in reduced column order.
    pub free_keys: Vec<String>,
    /// One coefficient per free key, then the intercept.
    pub coefficients: Vec<f64>,
}

impl Substitution {
    /// Create a substitution record.
    ///
    /// Panics when `coefficients` does not hold exactly one entry per free
    /// key plus the trailing intercept; [`Self::intercept`] and
    /// [`Self::terms`] rely on that shape.
    pub fn new(key: impl Into<String>, free_keys: Vec<String>, coefficients: Vec<f64>) -> Self {
        assert_eq!(
            coefficients.len(),
            free_keys.len() + 1,
            "a substitution over {} free keys needs {} coefficients",
            free_keys.len(),
            free_keys.len() + 1,
        );
        Self {
            key: key.into(),
            free_keys,
            coefficients,
        }
    }

    /// The constant term of the substitution.
    pub fn intercept(&self) -> f64 {
        self.coefficients[self.free_keys.len()]
    }

    /// Iterate over `(free_key, coefficient)` pairs.
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.free_keys
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
    }
}

/// The invertible mapping between original and reduced coordinate spaces.
///
/// Created once by [`crate::reduce::reduce_domain`] and immutable afterward.
/// Serializes to a list of `(key, free_keys, coefficients)` records, directly
/// representable as JSON for persistence or logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Substitutions in elimination order.
    pub equalities: Vec<Substitution>,
}

impl AffineTransform {
    /// Create a transform from substitution records.
    pub fn new(equalities: Vec<Substitution>) -> Self {
        Self { equalities }
    }

    /// Whether the transform eliminates nothing (the domain was irreducible).
    pub fn is_identity(&self) -> bool {
        self.equalities.is_empty()
    }

    /// Keys of the eliminated variables, in elimination order.
    pub fn eliminated_keys(&self) -> impl Iterator<Item = &str> {
        self.equalities.iter().map(|s| s.key.as_str())
    }

    /// Reconstruct the eliminated columns from reduced-space data.
    ///
    /// For each substitution in elimination order the eliminated column is
    /// computed as `intercept + Σ coeff_j · data[free_key_j]` and appended.
    /// Columns not referenced by any substitution (categoricals, outputs)
    /// pass through untouched.
    pub fn augment_data(&self, reduced: &DataTable) -> Result<DataTable, TableError> {
        let mut full = reduced.clone();
        for substitution in &self.equalities {
            let mut values = vec![substitution.intercept(); full.nrows()];
            for (key, coefficient) in substitution.terms() {
                let column = full.floats(key)?;
                for (value, x) in values.iter_mut().zip(column) {
                    *value += coefficient * x;
                }
            }
            full.insert(substitution.key.clone(), Column::Float(values))?;
        }
        Ok(full)
    }

    /// Project original-space data into reduced coordinates by removing the
    /// eliminated columns. No values are recomputed.
    pub fn drop_data(&self, full: &DataTable) -> DataTable {
        let eliminated: Vec<&str> = self.eliminated_keys().collect();
        full.without(&eliminated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn transform() -> AffineTransform {
        // x1 = 1 - x2 - x3, over free variables x2 and x3
        AffineTransform::new(vec![Substitution::new(
            "x1",
            vec!["x2".to_string(), "x3".to_string()],
            vec![-1.0, -1.0, 1.0],
        )])
    }

    #[test]
    #[should_panic(expected = "needs 3 coefficients")]
    fn test_new_rejects_missing_intercept() {
        Substitution::new(
            "x1",
            vec!["x2".to_string(), "x3".to_string()],
            vec![-1.0, -1.0],
        );
    }

    #[test]
    fn test_identity() {
        assert!(AffineTransform::default().is_identity());
        assert!(!transform().is_identity());
    }

    #[test]
    fn test_augment_reconstructs_eliminated_column() {
        let mut reduced = DataTable::new();
        reduced
            .insert("x2", Column::Float(vec![0.2, 0.5]))
            .unwrap();
        reduced
            .insert("x3", Column::Float(vec![0.3, 0.4]))
            .unwrap();
        reduced
            .insert("y", Column::Float(vec![7.0, 8.0]))
            .unwrap();

        let full = transform().augment_data(&reduced).unwrap();
        let x1 = full.floats("x1").unwrap();
        assert_abs_diff_eq!(x1[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x1[1], 0.1, epsilon = 1e-12);
        // pass-through column untouched
        assert_eq!(full.floats("y").unwrap(), &[7.0, 8.0]);
    }

    #[test]
    fn test_augment_missing_free_column() {
        let mut reduced = DataTable::new();
        reduced
            .insert("x2", Column::Float(vec![0.2]))
            .unwrap();
        let err = transform().augment_data(&reduced).unwrap_err();
        assert_eq!(err, TableError::MissingColumn("x3".to_string()));
    }

    #[test]
    fn test_drop_then_augment_round_trip() {
        // data satisfying x1 + x2 + x3 = 1 exactly
        let mut full = DataTable::new();
        full.insert("x1", Column::Float(vec![0.5, 0.1]))
            .unwrap();
        full.insert("x2", Column::Float(vec![0.2, 0.5]))
            .unwrap();
        full.insert("x3", Column::Float(vec![0.3, 0.4]))
            .unwrap();

        let transform = transform();
        let reduced = transform.drop_data(&full);
        assert!(!reduced.contains("x1"));

        let rebuilt = transform.augment_data(&reduced).unwrap();
        let original = full.floats("x1").unwrap();
        let reconstructed = rebuilt.floats("x1").unwrap();
        for (a, b) in original.iter().zip(reconstructed) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_substitution_augment() {
        let transform = AffineTransform::new(vec![Substitution::new(
            "x2",
            vec![],
            vec![1.0],
        )]);
        let mut reduced = DataTable::new();
        reduced
            .insert("x3", Column::Float(vec![0.0, 0.5, 1.0]))
            .unwrap();
        let full = transform.augment_data(&reduced).unwrap();
        assert_eq!(full.floats("x2").unwrap(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_serializes_to_stable_json_shape() {
        let json = serde_json::to_value(transform()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "equalities": [{
                    "key": "x1",
                    "free_keys": ["x2", "x3"],
                    "coefficients": [-1.0, -1.0, 1.0],
                }]
            })
        );
    }
}
