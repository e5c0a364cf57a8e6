//! Numeric linear algebra for equality-constraint systems.
//!
//! Provides reduced row-echelon form with partial pivoting and a rank-based
//! solvability check for augmented systems `[A|b]`. The tolerance is always
//! an explicit parameter so reduction behaviour is reproducible; callers
//! without special needs pass [`DEFAULT_TOL`].

use nalgebra::DMatrix;

use crate::utils::errors::ReduceError;

/// Default relative tolerance for pivot detection and rank decisions.
pub const DEFAULT_TOL: f64 = 1e-8;

/// Compute the reduced row-echelon form of `a` and its pivot columns.
///
/// Columns are processed left to right. For each column the candidate row
/// with the largest absolute entry (at or below the working row) is chosen
/// as pivot; a pivot with magnitude at most `tol` times the column's largest
/// absolute entry in the input skips the column without advancing the
/// working row. Making the threshold proportional to the column scale keeps
/// rank decisions invariant under uniform rescaling of the system: a row of
/// `1e-9` coefficients is a genuine pivot, while elimination residue in a
/// `1e10`-scale column is not. Pivot rows are scaled to a leading 1 and used
/// to eliminate the column in all other rows, above and below, yielding true
/// RREF rather than mere row-echelon form.
///
/// The returned pivot list is ascending; its length is the numerical rank of
/// `a` and never exceeds `min(rows, cols)`. Rows beyond the rank are zero.
pub fn rref(a: &DMatrix<f64>, tol: f64) -> (DMatrix<f64>, Vec<usize>) {
    let mut m = a.clone_owned();
    let (rows, cols) = m.shape();
    let mut pivots = Vec::new();
    let mut row = 0;

    // Per-column thresholds from the input matrix; the working matrix is no
    // guide once pivot rows have been normalized to a leading 1.
    let thresholds: Vec<f64> = (0..cols)
        .map(|c| tol * a.column(c).iter().fold(0.0f64, |acc, v| acc.max(v.abs())))
        .collect();

    for col in 0..cols {
        if row >= rows {
            break;
        }

        // Partial pivoting: largest absolute entry at or below the working row.
        let mut pivot = row;
        for r in row + 1..rows {
            if m[(r, col)].abs() > m[(pivot, col)].abs() {
                pivot = r;
            }
        }

        if m[(pivot, col)].abs() <= thresholds[col] {
            // Numerically dependent column: clear the residue so later
            // scans and callers see exact zeros.
            for r in row..rows {
                m[(r, col)] = 0.0;
            }
            continue;
        }

        m.swap_rows(row, pivot);

        let lead = m[(row, col)];
        for c in 0..cols {
            m[(row, c)] /= lead;
        }
        m[(row, col)] = 1.0;

        for r in 0..rows {
            if r == row {
                continue;
            }
            let factor = m[(r, col)];
            if factor == 0.0 {
                continue;
            }
            for c in 0..cols {
                let v = m[(row, c)];
                m[(r, c)] -= factor * v;
            }
            m[(r, col)] = 0.0;
        }

        pivots.push(col);
        row += 1;
    }

    (m, pivots)
}

/// Decide whether the equality system encoded by the augmented matrix
/// `[A|b]` is solvable.
///
/// Compares the rank of `A` against the rank of `[A|b]`, both computed via
/// [`rref`]. Equal ranks (including the degenerate all-zero case, rank 0)
/// mean the system is consistent; a strictly larger augmented rank means no
/// point satisfies all equalities simultaneously. Pivot thresholds are per
/// column, so the shared columns of the two computations are judged by the
/// same scale.
pub fn check_existence_of_solution(
    augmented: &DMatrix<f64>,
    tol: f64,
) -> Result<(), ReduceError> {
    if augmented.ncols() == 0 {
        return Ok(());
    }
    let coefficients = augmented.columns(0, augmented.ncols() - 1).into_owned();
    let (_, pivots_a) = rref(&coefficients, tol);
    let (_, pivots_augmented) = rref(augmented, tol);

    if pivots_augmented.len() > pivots_a.len() {
        return Err(ReduceError::InfeasibleConstraintSystem(format!(
            "rank of the coefficient matrix is {} but rank of the augmented matrix is {}; \
             no point satisfies every linear equality constraint",
            pivots_a.len(),
            pivots_augmented.len(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{E, PI};

    fn assert_matrix_eq(actual: &DMatrix<f64>, expected: &DMatrix<f64>) {
        assert_eq!(actual.shape(), expected.shape());
        for r in 0..actual.nrows() {
            for c in 0..actual.ncols() {
                assert_abs_diff_eq!(actual[(r, c)], expected[(r, c)], epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_rref_duplicate_rows() {
        let row = [PI, 1e10, 10f64.ln(), 7.0];
        let a = DMatrix::from_row_slice(2, 4, &[row, row].concat());
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        let expected = DMatrix::from_row_slice(
            2,
            4,
            &[
                1.0,
                1e10 / PI,
                10f64.ln() / PI,
                7.0 / PI,
                0.0,
                0.0,
                0.0,
                0.0,
            ],
        );
        assert_matrix_eq(&reduced, &expected);
        assert_eq!(pivots, vec![0]);
    }

    #[test]
    fn test_rref_mixed_scales() {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(4, 5, &[
            PI,        2.0,       1.0, 1.0, 1.0,
            1e10,      E,         2.0, 2.0, 2.0,
            10f64.ln(), -5.2,     3.0, 3.0, 3.0,
            7.0,       -3.5e-4,   4.0, 4.0, 4.0,
        ]);
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(4, 5, &[
            1.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 1.0, 1.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ]);
        assert_matrix_eq(&reduced, &expected);
        assert_eq!(pivots, vec![0, 1, 2]);
    }

    #[test]
    fn test_rref_all_ones() {
        let a = DMatrix::repeat(100, 100, 1.0);
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        let mut expected = DMatrix::zeros(100, 100);
        expected.fill_row(0, 1.0);
        assert_matrix_eq(&reduced, &expected);
        assert_eq!(pivots, vec![0]);
    }

    #[test]
    fn test_rref_zero_matrix() {
        let a = DMatrix::zeros(10, 20);
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        assert_matrix_eq(&reduced, &DMatrix::zeros(10, 20));
        assert!(pivots.is_empty());
    }

    #[test]
    fn test_rref_leading_zero_column() {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(3, 6, &[
            0.0, 1.0, 2.0,  2.0, 3.0,  4.0,
            0.0, 5.0, 10.0, 6.0, 7.0,  8.0,
            0.0, 9.0, 18.0, 10.0, 11.0, 12.0,
        ]);
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(3, 6, &[
            0.0, 1.0, 2.0, 0.0, -1.0, -2.0,
            0.0, 0.0, 0.0, 1.0,  2.0,  3.0,
            0.0, 0.0, 0.0, 0.0,  0.0,  0.0,
        ]);
        assert_matrix_eq(&reduced, &expected);
        assert_eq!(pivots, vec![1, 3]);
    }

    #[test]
    fn test_rref_consecutive_integers() {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(3, 4, &[
            1.0, 2.0,  3.0,  4.0,
            5.0, 6.0,  7.0,  8.0,
            9.0, 10.0, 11.0, 12.0,
        ]);
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(3, 4, &[
            1.0, 0.0, -1.0, -2.0,
            0.0, 1.0,  2.0,  3.0,
            0.0, 0.0,  0.0,  0.0,
        ]);
        assert_matrix_eq(&reduced, &expected);
        assert_eq!(pivots, vec![0, 1]);
    }

    #[test]
    fn test_rref_uniformly_small_matrix() {
        // a full row of 1e-9 coefficients is rank 1, not numerical noise
        let a = DMatrix::from_row_slice(1, 3, &[1e-9, 1e-9, 1e-9]);
        let (reduced, pivots) = rref(&a, DEFAULT_TOL);
        assert_eq!(pivots, vec![0]);
        assert_matrix_eq(&reduced, &DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_rref_idempotent() {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(3, 4, &[
            1.0, 2.0,  3.0,  4.0,
            5.0, 6.0,  7.0,  8.0,
            9.0, 10.0, 11.0, 12.0,
        ]);
        let (once, pivots_once) = rref(&a, DEFAULT_TOL);
        let (twice, pivots_twice) = rref(&once, DEFAULT_TOL);
        assert_matrix_eq(&twice, &once);
        assert_eq!(pivots_once, pivots_twice);
    }

    #[test]
    fn test_rref_rank_bound() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (_, pivots) = rref(&a, DEFAULT_TOL);
        assert!(pivots.len() <= 2);

        let empty = DMatrix::<f64>::zeros(0, 5);
        let (reduced, pivots) = rref(&empty, DEFAULT_TOL);
        assert_eq!(reduced.shape(), (0, 5));
        assert!(pivots.is_empty());
    }

    #[test]
    fn test_solution_exists_redundant_rows() {
        // rk(A) = rk([A|b]) = 1, three unknowns
        let aug = DMatrix::from_row_slice(2, 4, &[1.0, 0.0, 0.0, -0.5, 1.0, 0.0, 0.0, -0.5]);
        check_existence_of_solution(&aug, DEFAULT_TOL).unwrap();
    }

    #[test]
    fn test_solution_missing_contradictory_rows() {
        // rk(A) = 1 but rk([A|b]) = 2: x = 0.5 and x = -0.5 simultaneously
        let aug = DMatrix::from_row_slice(2, 4, &[1.0, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, -0.5]);
        let err = check_existence_of_solution(&aug, DEFAULT_TOL).unwrap_err();
        assert!(matches!(err, ReduceError::InfeasibleConstraintSystem(_)));
    }

    #[test]
    fn test_solution_missing_uniformly_small_contradiction() {
        // same left-hand side at 1e-9 scale, incompatible right-hand sides
        let aug =
            DMatrix::from_row_slice(2, 3, &[1e-9, 1e-9, 1e-9, 1e-9, 1e-9, 2e-9]);
        let err = check_existence_of_solution(&aug, DEFAULT_TOL).unwrap_err();
        assert!(matches!(err, ReduceError::InfeasibleConstraintSystem(_)));
    }

    #[test]
    fn test_solution_exists_independent_rows() {
        // rk(A) = rk([A|b]) = 2, three unknowns
        let aug = DMatrix::from_row_slice(2, 4, &[1.0, 0.0, 0.0, -0.5, 0.0, 1.0, 0.0, -0.5]);
        check_existence_of_solution(&aug, DEFAULT_TOL).unwrap();
    }

    #[test]
    fn test_solution_exists_all_zero() {
        // rank 0 on both sides is trivially consistent
        let aug = DMatrix::zeros(2, 4);
        check_existence_of_solution(&aug, DEFAULT_TOL).unwrap();
    }

    #[test]
    fn test_solution_exists_fully_determined() {
        // rk(A) = rk([A|b]) = 2 with two unknowns: consistent with a unique
        // solution; whether that point respects the bounds is decided later
        // by the reducer, not here.
        let aug = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, -0.5, 0.0, 1.0, -0.5]);
        check_existence_of_solution(&aug, DEFAULT_TOL).unwrap();
    }
}
