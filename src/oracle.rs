//! Linear separability of labeled binary points.
//!
//! Points `x_i ∈ {0,1}^F` with labels `y_i ∈ {0,1}` are linearly separable iff
//! there are weights `w` and a bias `b` with
//!
//! ```text
//! s_i * (w · x_i + b) >= 1   for all i,   where s_i = +1 if y_i = 1, else -1.
//! ```
//!
//! The margin `1` is an arbitrary positive constant: any strictly separating
//! hyperplane can be scaled to meet it. Moving everything to the left-hand side
//! gives one inequality per sample over the `F + 1` free unknowns `(w, b)`:
//!
//! ```text
//! -s_i * [x_i1, ..., x_iF, 1] · (w, b) <= -1
//! ```
//!
//! which is handed to an [`LpSolver`] as a pure feasibility problem.

use log::trace;
use num_rational::Ratio;

use crate::error::{Error, Result};
use crate::lp::{Bound, LpProblem, LpSolver, LpStatus};
use crate::simplex::Simplex;

/// Decides separability with the default [`Simplex`] backend.
///
/// ```
/// use threshold_rs::oracle::is_separable;
///
/// let x = [[0, 0], [0, 1], [1, 0], [1, 1]];
/// assert!(is_separable(&x, &[0, 0, 0, 1]).unwrap()); // AND
/// assert!(!is_separable(&x, &[0, 1, 1, 0]).unwrap()); // XOR
/// ```
pub fn is_separable<X: AsRef<[u8]>>(x: &[X], y: &[u8]) -> Result<bool> {
    Oracle::new(Simplex::default()).is_separable(x, y)
}

/// Builds the feasibility problem whose solutions are the separating `(w, b)`.
pub fn build_problem<X: AsRef<[u8]>>(x: &[X], y: &[u8]) -> Result<LpProblem> {
    let num_features = validate(x, y)?;
    let a_ub = x
        .iter()
        .zip(y)
        .map(|(row, &label)| {
            let s = if label == 1 { 1 } else { -1 };
            row.as_ref()
                .iter()
                .map(|&v| -s * v as i64)
                .chain(std::iter::once(-s))
                .collect()
        })
        .collect();
    let b_ub = vec![-1; x.len()];
    LpProblem::feasibility(a_ub, b_ub, vec![Bound::free(); num_features + 1])
}

/// Checks the sample set and returns the number of features.
fn validate<X: AsRef<[u8]>>(x: &[X], y: &[u8]) -> Result<usize> {
    if x.is_empty() {
        return Err(Error::shape("sample set is empty"));
    }
    if x.len() != y.len() {
        return Err(Error::shape(format!("{} samples but {} labels", x.len(), y.len())));
    }
    let num_features = x[0].as_ref().len();
    if num_features == 0 {
        return Err(Error::shape("samples have no features"));
    }
    for (i, row) in x.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != num_features {
            return Err(Error::shape(format!(
                "sample {} has {} features, expected {}",
                i,
                row.len(),
                num_features
            )));
        }
        if let Some(v) = row.iter().find(|&&v| v > 1) {
            return Err(Error::shape(format!("sample {} has non-binary feature {}", i, v)));
        }
    }
    if let Some(i) = y.iter().position(|&v| v > 1) {
        return Err(Error::shape(format!("label {} is {}, expected 0 or 1", i, y[i])));
    }
    Ok(num_features)
}

/// Separability oracle over a pluggable LP backend.
#[derive(Debug, Clone, Default)]
pub struct Oracle<S> {
    solver: S,
}

impl<S: LpSolver> Oracle<S> {
    pub fn new(solver: S) -> Self {
        Oracle { solver }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Returns whether the `y = 1` points can be strictly separated from the
    /// `y = 0` points by a hyperplane.
    ///
    /// A solver status other than optimal/infeasible, or a reported solution
    /// that does not actually separate the points, is an
    /// [`Error::SolverAmbiguous`].
    pub fn is_separable<X: AsRef<[u8]>>(&self, x: &[X], y: &[u8]) -> Result<bool> {
        let problem = build_problem(x, y)?;
        let solution = self.solver.solve(&problem)?;
        trace!("oracle: {:?} after {} pivots", solution.status, solution.iterations);
        match solution.status {
            LpStatus::Optimal => {
                if let Some(wb) = &solution.x {
                    if !separates(x, y, wb) {
                        return Err(Error::SolverAmbiguous {
                            status: LpStatus::NumericalFailure,
                        });
                    }
                }
                Ok(true)
            }
            LpStatus::Infeasible => Ok(false),
            status => Err(Error::SolverAmbiguous { status }),
        }
    }
}

/// Whether `(w, b)` satisfies every margin constraint exactly.
fn separates<X: AsRef<[u8]>>(x: &[X], y: &[u8], wb: &[Ratio<i64>]) -> bool {
    let Some((b, w)) = wb.split_last() else {
        return false;
    };
    let one = Ratio::from_integer(1);
    x.iter().zip(y).all(|(row, &label)| {
        let row = row.as_ref();
        if row.len() != w.len() {
            return false;
        }
        let activation = row
            .iter()
            .zip(w)
            .filter(|(v, _)| **v == 1)
            .fold(*b, |acc, (_, wi)| acc + wi);
        if label == 1 {
            activation >= one
        } else {
            activation <= -one
        }
    })
}
