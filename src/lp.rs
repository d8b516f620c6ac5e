//! Linear programs in inequality form and the solver interface.
//!
//! A problem is
//!
//! ```text
//! minimize    c · x
//! subject to  A_ub x <= b_ub
//!             lower_j <= x_j <= upper_j   (either side may be absent)
//! ```
//!
//! with integer coefficients. Solvers implement [`LpSolver`] and report an
//! [`LpStatus`]; only [`LpStatus::Optimal`] carries a solution vector.

use std::fmt;

use num_rational::Ratio;

use crate::error::{Error, Result};

/// Bounds of a single variable. `None` means unbounded on that side.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Bound {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl Bound {
    /// A free variable (both signs allowed).
    pub const fn free() -> Self {
        Bound { lower: None, upper: None }
    }

    /// `x >= lower`.
    pub const fn lower(lower: i64) -> Self {
        Bound {
            lower: Some(lower),
            upper: None,
        }
    }

    /// `x <= upper`.
    pub const fn upper(upper: i64) -> Self {
        Bound {
            lower: None,
            upper: Some(upper),
        }
    }

    /// `lower <= x <= upper`.
    pub const fn between(lower: i64, upper: i64) -> Self {
        Bound {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn is_free(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// An LP in inequality form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LpProblem {
    objective: Vec<i64>,
    a_ub: Vec<Vec<i64>>,
    b_ub: Vec<i64>,
    bounds: Vec<Bound>,
}

impl LpProblem {
    /// Creates a problem, checking that all dimensions agree.
    pub fn new(objective: Vec<i64>, a_ub: Vec<Vec<i64>>, b_ub: Vec<i64>, bounds: Vec<Bound>) -> Result<Self> {
        let n = objective.len();
        if n == 0 {
            return Err(Error::shape("LP problem has no variables"));
        }
        if bounds.len() != n {
            return Err(Error::shape(format!("expected {} bounds, got {}", n, bounds.len())));
        }
        if b_ub.len() != a_ub.len() {
            return Err(Error::shape(format!(
                "A_ub has {} rows but b_ub has {} entries",
                a_ub.len(),
                b_ub.len()
            )));
        }
        if let Some((i, row)) = a_ub.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::shape(format!(
                "A_ub row {} has {} columns, expected {}",
                i,
                row.len(),
                n
            )));
        }
        if let Some(j) = bounds.iter().position(|b| matches!((b.lower, b.upper), (Some(l), Some(u)) if l > u)) {
            return Err(Error::shape(format!("variable {} has lower bound above upper bound", j)));
        }
        Ok(LpProblem {
            objective,
            a_ub,
            b_ub,
            bounds,
        })
    }

    /// Creates a pure feasibility problem (zero objective).
    pub fn feasibility(a_ub: Vec<Vec<i64>>, b_ub: Vec<i64>, bounds: Vec<Bound>) -> Result<Self> {
        let n = bounds.len();
        Self::new(vec![0; n], a_ub, b_ub, bounds)
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.a_ub.len()
    }

    pub fn objective(&self) -> &[i64] {
        &self.objective
    }

    pub fn a_ub(&self) -> &[Vec<i64>] {
        &self.a_ub
    }

    pub fn b_ub(&self) -> &[i64] {
        &self.b_ub
    }

    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Returns `true` if `x` satisfies every constraint and bound exactly.
    pub fn is_satisfied_by(&self, x: &[Ratio<i64>]) -> bool {
        if x.len() != self.num_variables() {
            return false;
        }
        let within_bounds = self.bounds.iter().zip(x).all(|(b, v)| {
            b.lower.map_or(true, |l| *v >= Ratio::from_integer(l)) && b.upper.map_or(true, |u| *v <= Ratio::from_integer(u))
        });
        within_bounds
            && self.a_ub.iter().zip(&self.b_ub).all(|(row, &rhs)| {
                let lhs = row
                    .iter()
                    .zip(x)
                    .fold(Ratio::from_integer(0), |acc, (&a, v)| acc + *v * a);
                lhs <= Ratio::from_integer(rhs)
            })
    }
}

/// Outcome of an LP solve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LpStatus {
    /// A feasible (and optimal) point was found.
    Optimal,
    /// The constraints admit no point.
    Infeasible,
    /// The objective is unbounded below on the feasible region.
    Unbounded,
    /// The pivot budget ran out.
    IterationLimit,
    /// An intermediate value did not fit the solver's number representation.
    NumericalFailure,
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LpStatus::Optimal => "optimal",
            LpStatus::Infeasible => "infeasible",
            LpStatus::Unbounded => "unbounded",
            LpStatus::IterationLimit => "iteration limit reached",
            LpStatus::NumericalFailure => "numerical failure",
        };
        write!(f, "{}", s)
    }
}

/// Solver output: status, exact solution (on [`LpStatus::Optimal`]), pivot count.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LpSolution {
    pub status: LpStatus,
    pub x: Option<Vec<Ratio<i64>>>,
    pub iterations: usize,
}

impl LpSolution {
    pub fn with_status(status: LpStatus, iterations: usize) -> Self {
        LpSolution {
            status,
            x: None,
            iterations,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}

/// An LP backend.
///
/// Implementations must be reentrant: `solve` takes `&self`, and concurrent
/// calls must not observe each other.
pub trait LpSolver: Sync {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution>;
}

impl<S: LpSolver + ?Sized> LpSolver for &S {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution> {
        (**self).solve(problem)
    }
}
