//! Exact two-phase primal simplex on a fraction-free integer tableau.
//!
//! ## Representation
//!
//! The tableau stores integers only. The determinant `det` of the current
//! basis is a common denominator: entry `t[i][j]` stands for `t[i][j] / det`.
//! Pivoting on `(r, c)` with pivot element `p` updates every other row as
//!
//! ```text
//! t'[i][j] = (t[i][j] * p - t[i][c] * t[r][j]) / det
//! ```
//!
//! and sets `det := p`. The division is always exact (every entry is a minor
//! of the original integer matrix), so no rounding ever takes place.
//! We keep `det > 0` by negating the whole tableau when needed, which makes the
//! sign of an entry equal to the sign of the value it represents.
//!
//! Intermediate products are computed in `i128`, stored values are `i64`.
//! A value that does not fit is reported as [`LpStatus::NumericalFailure`]
//! rather than silently wrapping.
//!
//! ## Algorithm
//!
//! 1. Bring the problem to standard form with non-negative columns
//!    (see [`StandardForm`]).
//! 2. Add one slack per row. Rows with a negative right-hand side are negated
//!    and receive an artificial variable.
//! 3. Phase 1 minimizes the sum of artificials; a positive optimum proves
//!    infeasibility.
//! 4. Phase 2 minimizes the actual objective.
//!
//! Both phases follow Bland's rule, which rules out cycling.

use std::cmp::Ordering;

use log::trace;
use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedMul};

use crate::error::Result;
use crate::lp::{LpProblem, LpSolution, LpSolver, LpStatus};

/// Default pivot budget of [`Simplex`].
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// An exact simplex solver. Stateless: each [`solve`][LpSolver::solve] call
/// builds its own tableau.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Simplex {
    pub max_iterations: usize,
}

impl Simplex {
    pub fn new(max_iterations: usize) -> Self {
        Simplex { max_iterations }
    }
}

impl Default for Simplex {
    fn default() -> Self {
        Simplex::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl LpSolver for Simplex {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution> {
        Ok(self.run(problem).unwrap_or_else(|Overflow { iterations }| {
            trace!("simplex: overflow after {} pivots", iterations);
            LpSolution::with_status(LpStatus::NumericalFailure, iterations)
        }))
    }
}

/// An intermediate value left the `i64` range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Overflow {
    iterations: usize,
}

fn narrow(v: i128) -> Option<i64> {
    i64::try_from(v).ok()
}

/// How an original variable is expressed through standard-form columns:
/// `x = offset + Σ sign * column`.
#[derive(Debug, Clone)]
struct VarMap {
    offset: i64,
    terms: Vec<(usize, i64)>,
}

/// The problem rewritten as `rows · y <= rhs`, `y >= 0`, minimize `cost · y`.
#[derive(Debug, Clone)]
struct StandardForm {
    vars: Vec<VarMap>,
    num_columns: usize,
    rows: Vec<Vec<i64>>,
    rhs: Vec<i64>,
    cost: Vec<i64>,
}

impl StandardForm {
    fn build(problem: &LpProblem) -> Option<Self> {
        let mut vars = Vec::with_capacity(problem.num_variables());
        let mut num_columns = 0;
        // (column, upper - lower) for doubly bounded variables
        let mut ranges = Vec::new();

        for bound in problem.bounds() {
            let map = match (bound.lower, bound.upper) {
                (Some(l), u) => {
                    let col = num_columns;
                    num_columns += 1;
                    if let Some(u) = u {
                        ranges.push((col, u.checked_sub(l)?));
                    }
                    VarMap {
                        offset: l,
                        terms: vec![(col, 1)],
                    }
                }
                (None, Some(u)) => {
                    let col = num_columns;
                    num_columns += 1;
                    VarMap {
                        offset: u,
                        terms: vec![(col, -1)],
                    }
                }
                (None, None) => {
                    let col = num_columns;
                    num_columns += 2;
                    VarMap {
                        offset: 0,
                        terms: vec![(col, 1), (col + 1, -1)],
                    }
                }
            };
            vars.push(map);
        }

        let mut rows = Vec::with_capacity(problem.num_constraints() + ranges.len());
        let mut rhs = Vec::with_capacity(problem.num_constraints() + ranges.len());
        for (a, &b) in problem.a_ub().iter().zip(problem.b_ub()) {
            let mut row = vec![0i64; num_columns];
            let mut shift = b as i128;
            for (&coef, map) in a.iter().zip(&vars) {
                if coef == 0 {
                    continue;
                }
                shift -= coef as i128 * map.offset as i128;
                for &(col, sign) in &map.terms {
                    row[col] = narrow(row[col] as i128 + coef as i128 * sign as i128)?;
                }
            }
            rows.push(row);
            rhs.push(narrow(shift)?);
        }
        for (col, width) in ranges {
            let mut row = vec![0i64; num_columns];
            row[col] = 1;
            rows.push(row);
            rhs.push(width);
        }

        let mut cost = vec![0i64; num_columns];
        for (&c, map) in problem.objective().iter().zip(&vars) {
            for &(col, sign) in &map.terms {
                cost[col] = narrow(cost[col] as i128 + c as i128 * sign as i128)?;
            }
        }

        Some(StandardForm {
            vars,
            num_columns,
            rows,
            rhs,
            cost,
        })
    }
}

/// Result of one optimization phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Optimal,
    Unbounded,
    IterationLimit,
}

#[derive(Debug, Clone)]
struct Tableau {
    /// Constraint rows; the last entry of each row is the right-hand side.
    rows: Vec<Vec<i64>>,
    /// Reduced costs (scaled by `det`); the last entry is `-z * det`.
    obj: Vec<i64>,
    basis: Vec<usize>,
    det: i64,
    /// Columns allowed to enter the basis.
    eligible: Vec<bool>,
}

impl Tableau {
    fn width(&self) -> usize {
        self.obj.len() - 1
    }

    fn pivot(&mut self, r: usize, c: usize) -> Option<()> {
        let pivot_row = self.rows[r].clone();
        let p = pivot_row[c] as i128;
        let det = self.det as i128;
        debug_assert_ne!(p, 0);

        let update = |row: &mut [i64]| -> Option<()> {
            let f = row[c] as i128;
            if f == 0 {
                for v in row.iter_mut() {
                    let num = *v as i128 * p;
                    debug_assert_eq!(num % det, 0);
                    *v = narrow(num / det)?;
                }
            } else {
                for (v, &pr) in row.iter_mut().zip(&pivot_row) {
                    let num = *v as i128 * p - f * pr as i128;
                    debug_assert_eq!(num % det, 0);
                    *v = narrow(num / det)?;
                }
            }
            Some(())
        };

        for (i, row) in self.rows.iter_mut().enumerate() {
            if i != r {
                update(row.as_mut_slice())?;
            }
        }
        update(self.obj.as_mut_slice())?;

        self.det = pivot_row[c];
        self.basis[r] = c;

        if self.det < 0 {
            self.det = self.det.checked_neg()?;
            for v in self.rows.iter_mut().flatten().chain(self.obj.iter_mut()) {
                *v = v.checked_neg()?;
            }
        }
        Some(())
    }

    /// Bland's rule: the lowest-index eligible column with negative reduced cost.
    fn entering(&self) -> Option<usize> {
        (0..self.width()).find(|&j| self.eligible[j] && self.obj[j] < 0)
    }

    /// Minimum ratio test, ties broken by the lowest basic column.
    fn leaving(&self, c: usize) -> Option<usize> {
        let rhs = self.width();
        let mut best: Option<usize> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row[c] <= 0 {
                continue;
            }
            best = match best {
                None => Some(i),
                Some(k) => {
                    let lhs = row[rhs] as i128 * self.rows[k][c] as i128;
                    let cur = self.rows[k][rhs] as i128 * row[c] as i128;
                    match lhs.cmp(&cur) {
                        Ordering::Less => Some(i),
                        Ordering::Equal if self.basis[i] < self.basis[k] => Some(i),
                        _ => Some(k),
                    }
                }
            };
        }
        best
    }

    fn optimize(&mut self, iterations: &mut usize, max_iterations: usize) -> Option<Phase> {
        loop {
            let Some(c) = self.entering() else {
                return Some(Phase::Optimal);
            };
            let Some(r) = self.leaving(c) else {
                return Some(Phase::Unbounded);
            };
            if *iterations >= max_iterations {
                return Some(Phase::IterationLimit);
            }
            trace!("simplex: pivot #{} on row {}, column {} (det = {})", iterations, r, c, self.det);
            self.pivot(r, c)?;
            *iterations += 1;
        }
    }

    /// Recomputes the objective row for `cost` in the current basis.
    fn price(&mut self, cost: &[i64]) -> Option<()> {
        let width = self.width();
        for j in 0..=width {
            let mut v = if j < width { cost[j] as i128 * self.det as i128 } else { 0 };
            for (row, &b) in self.rows.iter().zip(&self.basis) {
                v -= cost[b] as i128 * row[j] as i128;
            }
            self.obj[j] = narrow(v)?;
        }
        Some(())
    }
}

impl Simplex {
    fn run(&self, problem: &LpProblem) -> Result<LpSolution, Overflow> {
        let mut iterations = 0;
        let overflow = |iterations| Overflow { iterations };

        let sf = StandardForm::build(problem).ok_or(overflow(0))?;
        let m = sf.rows.len();
        let n = sf.num_columns;
        let num_artificial = sf.rhs.iter().filter(|&&b| b < 0).count();
        // structural | slack | artificial | rhs
        let width = n + m + num_artificial;

        let mut rows = Vec::with_capacity(m);
        let mut basis = Vec::with_capacity(m);
        let mut next_artificial = n + m;
        for (i, (a, &b)) in sf.rows.iter().zip(&sf.rhs).enumerate() {
            let mut row = vec![0i64; width + 1];
            row[..n].copy_from_slice(a);
            row[n + i] = 1;
            row[width] = b;
            if b < 0 {
                for v in row.iter_mut() {
                    *v = v.checked_neg().ok_or(overflow(0))?;
                }
                row[next_artificial] = 1;
                basis.push(next_artificial);
                next_artificial += 1;
            } else {
                basis.push(n + i);
            }
            rows.push(row);
        }

        let mut eligible = vec![true; width];
        eligible[n + m..].fill(false);
        let mut tableau = Tableau {
            rows,
            obj: vec![0; width + 1],
            basis,
            det: 1,
            eligible,
        };

        if num_artificial > 0 {
            let phase1_cost: Vec<i64> = (0..width).map(|j| (j >= n + m) as i64).collect();
            tableau.price(&phase1_cost).ok_or(overflow(0))?;
            let phase = tableau
                .optimize(&mut iterations, self.max_iterations)
                .ok_or(overflow(iterations))?;
            match phase {
                Phase::Optimal => {}
                Phase::IterationLimit => return Ok(LpSolution::with_status(LpStatus::IterationLimit, iterations)),
                // The phase 1 objective is bounded below by zero.
                Phase::Unbounded => return Ok(LpSolution::with_status(LpStatus::NumericalFailure, iterations)),
            }
            if tableau.obj[width] != 0 {
                trace!("simplex: infeasible after {} pivots", iterations);
                return Ok(LpSolution::with_status(LpStatus::Infeasible, iterations));
            }
            self.drop_artificials(&mut tableau, n + m, &mut iterations)
                .ok_or(overflow(iterations))?;
        }

        let mut cost = sf.cost.clone();
        cost.resize(tableau.width(), 0);
        tableau.price(&cost).ok_or(overflow(iterations))?;
        let phase = tableau
            .optimize(&mut iterations, self.max_iterations)
            .ok_or(overflow(iterations))?;
        match phase {
            Phase::Optimal => {}
            Phase::Unbounded => return Ok(LpSolution::with_status(LpStatus::Unbounded, iterations)),
            Phase::IterationLimit => return Ok(LpSolution::with_status(LpStatus::IterationLimit, iterations)),
        }

        let x = Self::extract(&sf, &tableau).ok_or(overflow(iterations))?;
        trace!("simplex: optimal after {} pivots", iterations);
        Ok(LpSolution {
            status: LpStatus::Optimal,
            x: Some(x),
            iterations,
        })
    }

    /// Pivots zero-valued artificials out of the basis, drops the rows where
    /// that is impossible (they are redundant), and removes artificial columns.
    fn drop_artificials(&self, tableau: &mut Tableau, first_artificial: usize, iterations: &mut usize) -> Option<()> {
        let mut r = 0;
        while r < tableau.rows.len() {
            if tableau.basis[r] < first_artificial {
                r += 1;
                continue;
            }
            match (0..first_artificial).find(|&j| tableau.rows[r][j] != 0) {
                Some(c) => {
                    tableau.pivot(r, c)?;
                    *iterations += 1;
                    r += 1;
                }
                None => {
                    trace!("simplex: dropping redundant row {}", r);
                    tableau.rows.remove(r);
                    tableau.basis.remove(r);
                }
            }
        }

        let width = tableau.width();
        for row in tableau.rows.iter_mut().chain(std::iter::once(&mut tableau.obj)) {
            let rhs = row[width];
            row.truncate(first_artificial);
            row.push(rhs);
        }
        tableau.eligible.truncate(first_artificial);
        Some(())
    }

    fn extract(sf: &StandardForm, tableau: &Tableau) -> Option<Vec<Ratio<i64>>> {
        let width = tableau.width();
        let mut columns = vec![Ratio::from_integer(0i64); sf.num_columns];
        for (row, &b) in tableau.rows.iter().zip(&tableau.basis) {
            if b < sf.num_columns {
                columns[b] = Ratio::new(row[width], tableau.det);
            }
        }
        sf.vars
            .iter()
            .map(|map| {
                map.terms.iter().try_fold(Ratio::from_integer(map.offset), |acc, &(col, sign)| {
                    acc.checked_add(&columns[col].checked_mul(&Ratio::from_integer(sign))?)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::lp::Bound;

    fn r(n: i64, d: i64) -> Ratio<i64> {
        Ratio::new(n, d)
    }

    fn solve(problem: &LpProblem) -> LpSolution {
        Simplex::default().solve(problem).unwrap()
    }

    #[test]
    fn test_trivially_feasible() {
        // x <= 5, x >= 0
        let p = LpProblem::feasibility(vec![vec![1]], vec![5], vec![Bound::lower(0)]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert_eq!(sol.iterations, 0);
        assert!(p.is_satisfied_by(sol.x.as_ref().unwrap()));
    }

    #[test]
    fn test_feasible_needs_phase1() {
        // -x <= -1 (x >= 1), x <= 3, free
        let p = LpProblem::feasibility(vec![vec![-1], vec![1]], vec![-1, 3], vec![Bound::free()]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        let x = sol.x.unwrap();
        assert!(x[0] >= r(1, 1) && x[0] <= r(3, 1));
    }

    #[test]
    fn test_infeasible() {
        // x >= 2 and x <= 1
        let p = LpProblem::feasibility(vec![vec![-1], vec![1]], vec![-2, 1], vec![Bound::free()]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Infeasible);
        assert!(sol.x.is_none());
    }

    #[test]
    fn test_infeasible_by_bounds() {
        // x + y >= 3 with 0 <= x, y <= 1
        let p = LpProblem::feasibility(vec![vec![-1, -1]], vec![-3], vec![Bound::between(0, 1); 2]).unwrap();
        assert_eq!(solve(&p).status, LpStatus::Infeasible);
    }

    #[test]
    fn test_optimum_2d() {
        // minimize -x - y s.t. x + 2y <= 4, 3x + y <= 6, x, y >= 0
        // optimum at (8/5, 6/5)
        let p = LpProblem::new(
            vec![-1, -1],
            vec![vec![1, 2], vec![3, 1]],
            vec![4, 6],
            vec![Bound::lower(0); 2],
        )
        .unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert_eq!(sol.x.unwrap(), vec![r(8, 5), r(6, 5)]);
    }

    #[test]
    fn test_optimum_with_upper_bound_only() {
        // minimize -x s.t. x <= 7 (bound), and x - y <= 2, y <= 1 (bound)
        // y = 1, x = 3 is optimal
        let p = LpProblem::new(vec![-1, 0], vec![vec![1, -1]], vec![2], vec![Bound::upper(7), Bound::upper(1)]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert_eq!(sol.x.unwrap(), vec![r(3, 1), r(1, 1)]);
    }

    #[test]
    fn test_shifted_lower_bound() {
        // minimize x s.t. x >= -4 (bound), x + y <= 10, y in [2, 5]
        let p = LpProblem::new(vec![1, 0], vec![vec![1, 1]], vec![10], vec![Bound::lower(-4), Bound::between(2, 5)]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        let x = sol.x.unwrap();
        assert_eq!(x[0], r(-4, 1));
        assert!(p.is_satisfied_by(&x));
    }

    #[test]
    fn test_unbounded() {
        // minimize -x s.t. x - y <= 1, x, y >= 0
        let p = LpProblem::new(vec![-1, 0], vec![vec![1, -1]], vec![1], vec![Bound::lower(0); 2]).unwrap();
        assert_eq!(solve(&p).status, LpStatus::Unbounded);
    }

    #[test]
    fn test_unbounded_without_constraints() {
        let p = LpProblem::new(vec![1], vec![], vec![], vec![Bound::free()]).unwrap();
        assert_eq!(solve(&p).status, LpStatus::Unbounded);
    }

    #[test]
    fn test_zero_objective_no_constraints() {
        let p = LpProblem::feasibility(vec![], vec![], vec![Bound::free(), Bound::lower(3)]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert_eq!(sol.x.unwrap(), vec![r(0, 1), r(3, 1)]);
    }

    #[test]
    fn test_redundant_rows() {
        // x + y >= 1 stated twice, plus x + y <= 1: phase 1 ends with both
        // artificials basic at zero, and they must be pivoted out.
        let p = LpProblem::feasibility(
            vec![vec![-1, -1], vec![-1, -1], vec![1, 1]],
            vec![-1, -1, 1],
            vec![Bound::lower(0); 2],
        )
        .unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        let x = sol.x.unwrap();
        assert_eq!(x[0] + x[1], r(1, 1));
    }

    #[test]
    fn test_fractional_solution() {
        // 3x >= 1, 3x <= 2
        let p = LpProblem::feasibility(vec![vec![-3], vec![3]], vec![-1, 2], vec![Bound::free()]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!(p.is_satisfied_by(&sol.x.unwrap()));
    }

    #[test]
    fn test_iteration_limit() {
        let p = LpProblem::feasibility(vec![vec![-1], vec![1]], vec![-1, 3], vec![Bound::free()]).unwrap();
        let sol = Simplex::new(0).solve(&p).unwrap();
        assert_eq!(sol.status, LpStatus::IterationLimit);
    }

    #[test]
    fn test_overflow_reported() {
        // Shifting by the lower bound overflows the right-hand side.
        let p = LpProblem::feasibility(vec![vec![i64::MAX]], vec![i64::MIN], vec![Bound::lower(i64::MAX)]).unwrap();
        let sol = solve(&p);
        assert_eq!(sol.status, LpStatus::NumericalFailure);
    }

    #[test]
    fn test_stateless() {
        let solver = Simplex::default();
        let p = LpProblem::feasibility(vec![vec![-1, 1], vec![1, 1]], vec![-1, 4], vec![Bound::free(); 2]).unwrap();
        let a = solver.solve(&p).unwrap();
        let b = solver.solve(&p).unwrap();
        assert_eq!(a, b);
    }
}
