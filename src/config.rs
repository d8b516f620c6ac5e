//! Enumeration settings.

/// How an enumeration run is carried out. All settings leave the resulting
/// count unchanged; they only affect how fast it is obtained.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// Largest number of variables accepted (capped at
    /// [`MAX_SUPPORTED_N`][crate::enumerate::MAX_SUPPORTED_N]).
    pub max_n: usize,
    /// Spread oracle calls over a thread pool.
    pub parallel: bool,
    /// Size of the thread pool; `0` lets rayon decide.
    pub threads: usize,
    /// Evaluate only labelings whose first label is `0` and double the count.
    pub symmetry: bool,
    /// Log progress every this many labelings (`0` disables progress logs).
    pub progress_every: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_n: 4,
            parallel: true,
            threads: 0,
            symmetry: true,
            progress_every: 4096,
        }
    }
}

impl Config {
    /// Single-threaded, no symmetry reduction: one oracle call per labeling.
    pub fn reference() -> Self {
        Config {
            parallel: false,
            symmetry: false,
            ..Config::default()
        }
    }
}
