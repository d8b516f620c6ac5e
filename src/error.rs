//! Error type shared by the solver, the oracle and the enumeration driver.

use std::fmt;

use crate::lp::LpStatus;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while deciding or counting separability.
#[derive(Debug)]
pub enum Error {
    /// Malformed input: shape mismatch, empty sample set, non-binary value,
    /// or an inconsistent LP problem.
    InputShape(String),
    /// The LP solver returned something other than a clear feasible/infeasible verdict.
    SolverAmbiguous { status: LpStatus },
    /// The requested number of variables cannot be enumerated.
    Range { n: usize, max: usize },
    /// An oracle call failed for a particular label assignment.
    Labeling { n: usize, index: u64, source: Box<Error> },
    /// The worker pool could not be built.
    ThreadPool(String),
}

impl Error {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Error::InputShape(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputShape(msg) => write!(f, "Invalid input: {}", msg),
            Error::SolverAmbiguous { status } => {
                write!(f, "LP solver returned ambiguous status: {}", status)
            }
            Error::Range { n, max } => {
                write!(f, "N = {} is out of range (supported: 1..={})", n, max)
            }
            Error::Labeling { n, index, source } => {
                write!(f, "Separability check failed for N = {}, labeling #{}: {}", n, index, source)
            }
            Error::ThreadPool(msg) => write!(f, "Failed to build thread pool: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Labeling { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_labeling_error_chain() {
        let inner = Error::SolverAmbiguous {
            status: LpStatus::NumericalFailure,
        };
        let err = Error::Labeling {
            n: 3,
            index: 42,
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.contains("N = 3"));
        assert!(msg.contains("#42"));
        assert!(msg.contains("numerical failure"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_range_message() {
        let err = Error::Range { n: 7, max: 4 };
        assert_eq!(err.to_string(), "N = 7 is out of range (supported: 1..=4)");
        assert!(err.source().is_none());
    }
}
