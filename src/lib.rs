//! # threshold-rs: counting linearly separable Boolean functions
//!
//! A Boolean function `f: {0,1}^n → {0,1}` is **linearly separable** (a
//! *threshold function*) if a single perceptron computes it: there are weights
//! `w` and a bias `b` such that `f(x) = 1` exactly when `w · x + b > 0`.
//!
//! This crate decides separability exactly, by reducing it to the feasibility of
//! a small linear program, and counts the separable functions of `n` variables by
//! checking all `2^(2^n)` of them.
//!
//! | n | functions | separable |
//! |---|-----------|-----------|
//! | 1 | 4         | 4         |
//! | 2 | 16        | 14        |
//! | 3 | 256       | 104       |
//! | 4 | 65536     | 1882      |
//!
//! ## Basic Usage
//!
//! ```rust
//! use threshold_rs::cube::BooleanCube;
//! use threshold_rs::oracle::is_separable;
//!
//! let x = BooleanCube::new(2).to_matrix(); // (0,0) (0,1) (1,0) (1,1)
//!
//! assert!(is_separable(&x, &[0, 1, 1, 1]).unwrap()); // OR
//! assert!(!is_separable(&x, &[0, 1, 1, 0]).unwrap()); // XOR
//!
//! assert_eq!(threshold_rs::enumerate::count_separable(3).unwrap(), 104);
//! ```
//!
//! ## Core Components
//!
//! - **[`oracle`]**: builds the margin constraints `±(w · x_i + b) >= 1` and asks
//!   an LP solver whether they are feasible.
//! - **[`lp`]**: the LP problem type and the [`LpSolver`][lp::LpSolver] trait, so
//!   the backend can be swapped without touching the oracle.
//! - **[`simplex`]**: the built-in backend, an exact fraction-free simplex.
//! - **[`enumerate`]**: the driver that runs the oracle over every labeling of
//!   the cube, sequentially or on a thread pool.
//! - **[`cube`]** and **[`labeling`]**: the two restartable generators the
//!   driver combines.

pub mod config;
pub mod cube;
pub mod enumerate;
pub mod error;
pub mod labeling;
pub mod lp;
pub mod oracle;
pub mod simplex;

pub use config::Config;
pub use error::{Error, Result};
