//! Ordered, named data columns for moving samples between coordinate spaces.
//!
//! A [`DataTable`] is a deliberately small column store: the reduction engine
//! only needs named numeric columns for the continuous features plus opaque
//! pass-through columns (categorical labels, outputs). Column order is
//! insertion order and is preserved by every operation.

use serde::{Deserialize, Serialize};

use crate::utils::errors::TableError;

/// A single named column of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Numeric data.
    Float(Vec<f64>),
    /// Categorical labels or other opaque text data.
    Text(Vec<String>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numeric values, if this is a float column.
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            Column::Text(_) => None,
        }
    }
}

/// An ordered collection of uniformly sized, named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<(String, Column)>,
}

impl DataTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (zero for a table without columns).
    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether a column with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Column names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Numeric values of the named column.
    pub fn floats(&self, name: &str) -> Result<&[f64], TableError> {
        let column = self
            .get(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
        column
            .as_floats()
            .ok_or_else(|| TableError::NotNumeric(name.to_string()))
    }

    /// Insert a column, replacing any existing column with the same name.
    ///
    /// The column must match the table's row count unless it is the only
    /// column after insertion.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<(), TableError> {
        let name = name.into();
        let other_rows = self
            .columns
            .iter()
            .find(|(n, _)| *n != name)
            .map(|(_, c)| c.len());
        if let Some(expected) = other_rows {
            if column.len() != expected {
                return Err(TableError::LengthMismatch {
                    name,
                    len: column.len(),
                    expected,
                });
            }
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    /// Copy of this table without the named columns (projection).
    pub fn without<S: AsRef<str>>(&self, names: &[S]) -> DataTable {
        let columns = self
            .columns
            .iter()
            .filter(|(n, _)| !names.iter().any(|drop| drop.as_ref() == n))
            .cloned()
            .collect();
        DataTable { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        let mut table = DataTable::new();
        table
            .insert("x1", Column::Float(vec![1.0, 2.0, 3.0]))
            .unwrap();
        table
            .insert("x2", Column::Float(vec![4.0, 5.0, 6.0]))
            .unwrap();
        table
            .insert(
                "label",
                Column::Text(vec!["a".into(), "b".into(), "a".into()]),
            )
            .unwrap();
        table
    }

    #[test]
    fn test_shape_and_lookup() {
        let table = sample();
        assert_eq!(table.nrows(), 3);
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["x1", "x2", "label"]);
        assert_eq!(table.floats("x2").unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_float_access_errors() {
        let table = sample();
        assert_eq!(
            table.floats("missing"),
            Err(TableError::MissingColumn("missing".to_string()))
        );
        assert_eq!(
            table.floats("label"),
            Err(TableError::NotNumeric("label".to_string()))
        );
    }

    #[test]
    fn test_insert_length_mismatch() {
        let mut table = sample();
        let err = table
            .insert("x3", Column::Float(vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { .. }));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut table = sample();
        table
            .insert("x1", Column::Float(vec![9.0, 9.0, 9.0]))
            .unwrap();
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.floats("x1").unwrap(), &[9.0, 9.0, 9.0]);
        // replaced in place, not reordered
        assert_eq!(table.names().next(), Some("x1"));
    }

    #[test]
    fn test_without_projects_columns() {
        let table = sample();
        let projected = table.without(&["x1"]);
        assert_eq!(projected.ncols(), 2);
        assert!(!projected.contains("x1"));
        assert!(projected.contains("label"));
        // source table untouched
        assert!(table.contains("x1"));
    }
}
