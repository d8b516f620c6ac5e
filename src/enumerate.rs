//! Counting linearly separable Boolean functions by exhaustive enumeration.
//!
//! For `n` variables, every labeling of the `2^n` cube points is one Boolean
//! function. The [`Enumerator`] runs the separability [`Oracle`] once per
//! labeling and counts the successes.
//!
//! Oracle calls are independent, so they may be distributed over a thread pool
//! and summed in any order. Separability is also invariant under flipping all
//! labels, so it suffices to evaluate the half of the labelings whose first
//! label is `0` and double the result.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info};
use num_bigint::BigUint;
use rayon::prelude::*;

use crate::config::Config;
use crate::cube::BooleanCube;
use crate::error::{Error, Result};
use crate::labeling::{Labeling, Labelings};
use crate::lp::LpSolver;
use crate::oracle::Oracle;
use crate::simplex::Simplex;

/// Largest number of variables the enumerator accepts at all.
///
/// `n = 5` already means `2^32` oracle calls; beyond that the labeling index
/// no longer fits the enumeration range.
pub const MAX_SUPPORTED_N: usize = 5;

/// Counts the linearly separable Boolean functions of `n` variables using the
/// default configuration and solver.
///
/// ```
/// assert_eq!(threshold_rs::enumerate::count_separable(2).unwrap(), 14);
/// ```
pub fn count_separable(n: usize) -> Result<u64> {
    Enumerator::new(Config::default(), Simplex::default()).count(n)
}

/// Outcome of one enumeration run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnumerationReport {
    /// Number of variables.
    pub n: usize,
    /// Number of linearly separable functions.
    pub separable: u64,
    /// Number of labelings, `2^(2^n)` for the full cube.
    pub total: BigUint,
    /// Number of oracle calls made.
    pub oracle_calls: u64,
    pub elapsed: Duration,
}

impl fmt::Display for EnumerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "For N={}: {}", self.n, self.separable)
    }
}

/// Exhaustive enumeration driver.
#[derive(Debug, Clone)]
pub struct Enumerator<S> {
    config: Config,
    oracle: Oracle<S>,
}

impl<S: LpSolver> Enumerator<S> {
    pub fn new(config: Config, solver: S) -> Self {
        Enumerator {
            config,
            oracle: Oracle::new(solver),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn oracle(&self) -> &Oracle<S> {
        &self.oracle
    }

    /// Largest `n` this enumerator accepts.
    pub fn max_n(&self) -> usize {
        self.config.max_n.min(MAX_SUPPORTED_N)
    }

    /// Fails with [`Error::Range`] unless `1 <= n <= max_n()`.
    pub fn check_range(&self, n: usize) -> Result<()> {
        let max = self.max_n();
        if n == 0 || n > max {
            return Err(Error::Range { n, max });
        }
        Ok(())
    }

    /// Number of linearly separable Boolean functions of `n` variables.
    pub fn count(&self, n: usize) -> Result<u64> {
        self.report(n).map(|report| report.separable)
    }

    /// Enumerates all functions of `n` variables and reports the result.
    pub fn report(&self, n: usize) -> Result<EnumerationReport> {
        self.check_range(n)?;
        let points = BooleanCube::new(n).to_matrix();
        self.report_points(n, &points)
    }

    /// Like [`report`][Self::report], but over an explicit list of points
    /// (for example the cube in a different order).
    ///
    /// Labeling `i` assigns to `points[k]` the `k`-th most significant of
    /// `points.len()` bits of `i`.
    pub fn report_points(&self, n: usize, points: &[Vec<u8>]) -> Result<EnumerationReport> {
        self.check_range(n)?;
        let width = points.len();
        if width == 0 || width > 1 << self.max_n() {
            return Err(Error::shape(format!(
                "cannot enumerate labelings of {} points (at most {})",
                width,
                1usize << self.max_n()
            )));
        }
        if let Some(i) = points.iter().position(|p| p.len() != n) {
            return Err(Error::shape(format!("point {} has {} coordinates, expected {}", i, points[i].len(), n)));
        }

        let start = Instant::now();
        let all = Labelings::all(width).indices();
        // Labelings whose first label is 0 form the lower half of the index range.
        let indices = if self.config.symmetry { 0..all.end / 2 } else { all };
        let oracle_calls = indices.end - indices.start;
        debug!(
            "Enumerating {} labelings of {} points (parallel = {}, symmetry = {})",
            oracle_calls, width, self.config.parallel, self.config.symmetry
        );

        let evaluated = if self.config.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()?;
            pool.install(|| self.count_parallel(n, points, indices))?
        } else {
            self.count_sequential(n, points, indices)?
        };
        let separable = if self.config.symmetry { 2 * evaluated } else { evaluated };

        let report = EnumerationReport {
            n,
            separable,
            total: BigUint::from(1u8) << width,
            oracle_calls,
            elapsed: start.elapsed(),
        };
        info!(
            "N = {}: {} of {} functions are linearly separable ({} oracle calls in {:.3} s)",
            n,
            report.separable,
            report.total,
            report.oracle_calls,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    fn check(&self, n: usize, points: &[Vec<u8>], index: u64) -> Result<bool> {
        let labeling = Labeling::new(points.len(), index);
        self.oracle
            .is_separable(points, &labeling.labels())
            .map_err(|e| Error::Labeling {
                n,
                index,
                source: Box::new(e),
            })
    }

    fn progress(&self, done: u64, total: u64, count: Option<u64>) {
        let every = self.config.progress_every;
        if every != 0 && done % every == 0 {
            match count {
                Some(count) => debug!("... {}/{} labelings checked, {} separable", done, total, count),
                None => debug!("... {}/{} labelings checked", done, total),
            }
        }
    }

    fn count_sequential(&self, n: usize, points: &[Vec<u8>], indices: std::ops::Range<u64>) -> Result<u64> {
        let total = indices.end - indices.start;
        let mut count = 0;
        for (done, index) in indices.enumerate() {
            if self.check(n, points, index)? {
                count += 1;
            }
            self.progress(done as u64 + 1, total, Some(count));
        }
        Ok(count)
    }

    fn count_parallel(&self, n: usize, points: &[Vec<u8>], indices: std::ops::Range<u64>) -> Result<u64> {
        let total = indices.end - indices.start;
        let done = AtomicU64::new(0);
        indices
            .into_par_iter()
            .map(|index| -> Result<u64> {
                let separable = self.check(n, points, index)?;
                self.progress(done.fetch_add(1, Ordering::Relaxed) + 1, total, None);
                Ok(separable as u64)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::lp::{LpProblem, LpSolution, LpStatus};

    fn enumerator(config: Config) -> Enumerator<Simplex> {
        Enumerator::new(config, Simplex::default())
    }

    #[test]
    fn test_small_counts() {
        let e = enumerator(Config::reference());
        assert_eq!(e.count(1).unwrap(), 4);
        assert_eq!(e.count(2).unwrap(), 14);
    }

    #[test]
    fn test_strategies_agree() {
        let configs = [
            Config::reference(),
            Config {
                symmetry: true,
                ..Config::reference()
            },
            Config {
                parallel: true,
                threads: 2,
                ..Config::reference()
            },
            Config::default(),
        ];
        for config in configs {
            assert_eq!(enumerator(config).count(3).unwrap(), 104, "{:?}", config);
        }
    }

    #[test]
    fn test_report() {
        let report = enumerator(Config::default()).report(2).unwrap();
        assert_eq!(report.n, 2);
        assert_eq!(report.separable, 14);
        assert_eq!(report.total, BigUint::from(16u32));
        assert_eq!(report.oracle_calls, 8);
        assert_eq!(report.to_string(), "For N=2: 14");

        let report = enumerator(Config::reference()).report(2).unwrap();
        assert_eq!(report.oracle_calls, 16);
    }

    #[test]
    fn test_range_errors() {
        let e = enumerator(Config::default());
        assert!(matches!(e.count(0), Err(Error::Range { n: 0, max: 4 })));
        assert!(matches!(e.count(5), Err(Error::Range { n: 5, max: 4 })));

        let wide = enumerator(Config {
            max_n: 10,
            ..Config::default()
        });
        assert_eq!(wide.max_n(), MAX_SUPPORTED_N);
        assert!(matches!(wide.count(6), Err(Error::Range { n: 6, max: 5 })));
    }

    #[test]
    fn test_failing_labeling_is_reported() {
        /// Fails on the XOR labeling of two variables.
        struct FailOnXor;

        impl LpSolver for FailOnXor {
            fn solve(&self, problem: &LpProblem) -> Result<LpSolution> {
                // XOR = [0, 1, 1, 0]: the rows of points labeled 1 have a
                // bias coefficient of -1.
                let bias: Vec<i64> = problem.a_ub().iter().map(|row| row[2]).collect();
                if bias == [1, -1, -1, 1] {
                    Ok(LpSolution::with_status(LpStatus::IterationLimit, 0))
                } else {
                    Simplex::default().solve(problem)
                }
            }
        }

        for config in [Config::reference(), Config::default()] {
            let e = Enumerator::new(config, FailOnXor);
            match e.count(2) {
                Err(Error::Labeling { n, index, source }) => {
                    assert_eq!(n, 2);
                    assert_eq!(index, 0b0110);
                    assert!(matches!(
                        *source,
                        Error::SolverAmbiguous {
                            status: LpStatus::IterationLimit
                        }
                    ));
                }
                other => panic!("expected labeling error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_permuted_points() {
        let e = enumerator(Config::default());
        let mut points = BooleanCube::new(3).to_matrix();
        points.reverse();
        points.swap(1, 5);
        let report = e.report_points(3, &points).unwrap();
        assert_eq!(report.separable, 104);
    }

    #[test]
    fn test_too_many_points() {
        let e = enumerator(Config::default());
        let points = vec![vec![0u8]; 17];
        assert!(matches!(e.report_points(1, &points), Err(Error::InputShape(_))));
    }
}
