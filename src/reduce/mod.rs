//! Domain reduction: eliminating continuous variables that are fully
//! determined by linear equality constraints.
//!
//! [`reduce_domain`] row-reduces the augmented equality matrix of a domain,
//! picks the pivot variables for elimination, derives an affine substitution
//! per eliminated variable, propagates bounds through single-variable
//! substitutions, rewrites every inequality constraint over the free
//! variables, and assembles a new, smaller domain plus the
//! [`AffineTransform`] connecting the two coordinate spaces.
//!
//! The whole computation is a pure function of its input: nothing is cached,
//! nothing global is touched, and the input domain is never mutated.

pub mod transform;

pub use transform::{AffineTransform, Substitution};

use std::collections::HashMap;

use nalgebra::DMatrix;
use tracing::{debug, trace};

use crate::domain::{Constraint, Domain, Feature, LinearConstraint};
use crate::utils::errors::ReduceError;
use crate::utils::linalg::{check_existence_of_solution, rref, DEFAULT_TOL};

/// Cheap structural pre-filter: does reduction even apply to this domain?
///
/// Returns `false` when the domain has no constraints, no linear equality
/// constraint, or no continuous features. A `true` result does not imply
/// feasibility; [`reduce_domain`] verifies that independently.
pub fn check_domain_for_reduction(domain: &Domain) -> bool {
    let has_equality = domain.constraints().iter().any(Constraint::is_equality);
    let has_continuous = domain.features().iter().any(Feature::is_continuous);
    has_equality && has_continuous
}

/// Reduce a domain with the default numerical tolerance.
///
/// See [`reduce_domain_with_tolerance`] for the full contract.
pub fn reduce_domain(domain: &Domain) -> Result<(Domain, AffineTransform), ReduceError> {
    reduce_domain_with_tolerance(domain, DEFAULT_TOL)
}

/// Reduce a domain, eliminating every continuous variable pinned down by the
/// linear equality constraints.
///
/// Irreducible domains come back unchanged with an identity transform.
/// Otherwise the result is a domain over the free variables only: eliminated
/// features are removed, bounds are tightened where a substitution has a
/// single free variable, inequality constraints are rewritten over the free
/// variables, and all equality constraints are consumed. The accompanying
/// [`AffineTransform`] restates each eliminated variable as an affine
/// function of the free ones.
///
/// Fails with [`ReduceError::InfeasibleConstraintSystem`] when the equality
/// system is contradictory, when a bound intersection becomes empty, or when
/// a variable is fixed to a constant outside its bounds. No partial result
/// is returned on failure.
pub fn reduce_domain_with_tolerance(
    domain: &Domain,
    tol: f64,
) -> Result<(Domain, AffineTransform), ReduceError> {
    if !check_domain_for_reduction(domain) {
        debug!("domain has no reducible equality structure, returning it unchanged");
        return Ok((domain.clone(), AffineTransform::default()));
    }

    // Columns are the continuous variables in domain order; one row per
    // linear equality; the right-hand sides form the last column.
    let keys = domain.continuous_keys();
    let n = keys.len();
    let column: HashMap<&str, usize> = keys.iter().enumerate().map(|(i, &k)| (k, i)).collect();

    let equalities: Vec<&LinearConstraint> = domain
        .constraints()
        .iter()
        .filter_map(|c| match c {
            Constraint::LinearEquality(lc) => Some(lc),
            _ => None,
        })
        .collect();

    let mut augmented = DMatrix::zeros(equalities.len(), n + 1);
    for (row, equality) in equalities.iter().enumerate() {
        for (key, coefficient) in equality.terms() {
            augmented[(row, column[key])] += coefficient;
        }
        augmented[(row, n)] = equality.rhs;
    }
    debug!(
        equalities = equalities.len(),
        variables = n,
        "assembled augmented equality matrix"
    );

    check_existence_of_solution(&augmented, tol)?;

    let (reduced, pivots) = rref(&augmented, tol);
    if pivots.iter().any(|&p| p >= n) {
        // cannot happen after a passing feasibility check unless the two
        // rank computations disagree at the tolerance boundary
        return Err(ReduceError::InfeasibleConstraintSystem(
            "the right-hand-side column became a pivot during row reduction".to_string(),
        ));
    }

    let mut is_pivot = vec![false; n];
    for &p in &pivots {
        is_pivot[p] = true;
    }
    let free_columns: Vec<usize> = (0..n).filter(|&c| !is_pivot[c]).collect();
    trace!(?pivots, ?free_columns, "pivot and free column split");

    // One substitution per pivot row: x_p = rhs - Σ a_j·x_j over the free
    // columns with nonzero entries, i.e. coefficients -a_j plus intercept.
    let mut substitutions = Vec::with_capacity(pivots.len());
    for (row, &p) in pivots.iter().enumerate() {
        let mut free_keys = Vec::new();
        let mut coefficients = Vec::new();
        for &j in &free_columns {
            let a = reduced[(row, j)];
            if a.abs() > tol {
                free_keys.push(keys[j].to_string());
                coefficients.push(-a);
            }
        }
        coefficients.push(reduced[(row, n)]);
        substitutions.push(Substitution::new(keys[p].to_string(), free_keys, coefficients));
    }

    // Bound handling per substitution, against the eliminated variable's own
    // bounds. Single-free-variable substitutions tighten the free variable;
    // constant substitutions are checked directly; substitutions with two or
    // more free variables keep their bounds as a pair of inequality
    // constraints instead (no multi-variable tightening is attempted).
    let mut bounds: HashMap<&str, (f64, f64)> = domain
        .continuous()
        .map(|f| (f.key.as_str(), (f.lower_bound, f.upper_bound)))
        .collect();
    let mut bound_constraints = Vec::new();

    for substitution in &substitutions {
        let (lower_p, upper_p) = bounds[substitution.key.as_str()];
        match substitution.free_keys.len() {
            0 => {
                let value = substitution.intercept();
                if value < lower_p || value > upper_p {
                    return Err(ReduceError::InfeasibleConstraintSystem(format!(
                        "the equality constraints fix `{}` to {value}, outside its bounds \
                         [{lower_p}, {upper_p}]",
                        substitution.key,
                    )));
                }
            }
            1 => {
                let c = substitution.coefficients[0];
                let intercept = substitution.intercept();
                let mut implied_lower = (lower_p - intercept) / c;
                let mut implied_upper = (upper_p - intercept) / c;
                if c < 0.0 {
                    std::mem::swap(&mut implied_lower, &mut implied_upper);
                }
                let free = substitution.free_keys[0].as_str();
                if let Some((lower, upper)) = bounds.get_mut(free) {
                    *lower = lower.max(implied_lower);
                    *upper = upper.min(implied_upper);
                    if *lower > *upper {
                        return Err(ReduceError::InfeasibleConstraintSystem(format!(
                            "bounds of `{free}` became empty after propagating the bounds \
                             of eliminated `{}`",
                            substitution.key,
                        )));
                    }
                    trace!(
                        free,
                        eliminated = substitution.key.as_str(),
                        lower = *lower,
                        upper = *upper,
                        "tightened bounds"
                    );
                }
            }
            _ => {
                let intercept = substitution.intercept();
                let coefficients = &substitution.coefficients[..substitution.free_keys.len()];
                bound_constraints.push(Constraint::LinearInequality(LinearConstraint::new(
                    substitution.free_keys.clone(),
                    coefficients.iter().copied(),
                    upper_p - intercept,
                )));
                bound_constraints.push(Constraint::LinearInequality(LinearConstraint::new(
                    substitution.free_keys.clone(),
                    coefficients.iter().map(|c| -c),
                    intercept - lower_p,
                )));
            }
        }
    }

    // Rewrite every inequality over the free variables: eliminated terms are
    // replaced by their substitution, coefficients accumulate per free key
    // and intercept contributions fold into the right-hand side.
    let eliminated: HashMap<&str, &Substitution> = substitutions
        .iter()
        .map(|s| (s.key.as_str(), s))
        .collect();
    let free_key_order: Vec<&str> = free_columns.iter().map(|&j| keys[j]).collect();

    let mut constraints = Vec::new();
    for constraint in domain.constraints() {
        match constraint {
            // consumed by the reduction
            Constraint::LinearEquality(_) => {}
            // untouched by linear reduction
            Constraint::NChooseK(_) => constraints.push(constraint.clone()),
            Constraint::LinearInequality(inequality) => {
                let mut accumulated: HashMap<&str, f64> = HashMap::new();
                let mut rhs = inequality.rhs;
                for (key, coefficient) in inequality.terms() {
                    match eliminated.get(key) {
                        Some(substitution) => {
                            rhs -= coefficient * substitution.intercept();
                            for (free_key, free_coefficient) in substitution.terms() {
                                *accumulated.entry(free_key).or_insert(0.0) +=
                                    coefficient * free_coefficient;
                            }
                        }
                        None => {
                            *accumulated.entry(key).or_insert(0.0) += coefficient;
                        }
                    }
                }

                let mut features = Vec::new();
                let mut coefficients = Vec::new();
                for &key in &free_key_order {
                    if let Some(&c) = accumulated.get(key) {
                        if c.abs() > tol {
                            features.push(key.to_string());
                            coefficients.push(c);
                        }
                    }
                }

                if features.is_empty() {
                    // the substitution cancelled every term: `0 ≤ rhs`
                    if rhs < -tol {
                        return Err(ReduceError::InfeasibleConstraintSystem(format!(
                            "an inequality constraint reduces to 0 ≤ {rhs}, which cannot hold",
                        )));
                    }
                    trace!("inequality became trivially satisfied, dropping it");
                } else {
                    constraints.push(Constraint::LinearInequality(LinearConstraint {
                        features,
                        coefficients,
                        rhs,
                    }));
                }
            }
        }
    }
    constraints.extend(bound_constraints);

    // Assemble the reduced domain: original feature order with eliminated
    // continuous features removed and surviving bounds possibly tightened.
    let features: Vec<Feature> = domain
        .features()
        .iter()
        .filter_map(|feature| match feature {
            Feature::Continuous(c) => {
                if eliminated.contains_key(c.key.as_str()) {
                    None
                } else {
                    let (lower, upper) = bounds[c.key.as_str()];
                    Some(Feature::Continuous(c.with_bounds(lower, upper)))
                }
            }
            Feature::Categorical(_) => Some(feature.clone()),
        })
        .collect();

    debug!(
        eliminated = substitutions.len(),
        features = features.len(),
        constraints = constraints.len(),
        "domain reduced"
    );

    let reduced_domain = Domain::new(features, constraints)?;
    Ok((reduced_domain, AffineTransform::new(substitutions)))
}
