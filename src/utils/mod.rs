//! Shared utilities: error types, numeric linear algebra, data tables.

pub mod errors;
pub mod linalg;
pub mod table;
