//! Label assignments over the points of a cube, indexed by integers.
//!
//! A labeling of width `w` is an integer `index ∈ [0, 2^w)`. Its binary
//! expansion, zero-padded to `w` bits and read most significant bit first,
//! gives the label of each point in cube order. For the cube `{0,1}^n`,
//! `w = 2^n`, and every Boolean function on `n` variables is exactly one
//! labeling.
//!
//! ```text
//! w = 4, index = 6 = 0b0110  ->  labels [0, 1, 1, 0]   (XOR on 2 variables)
//! ```

use std::fmt;
use std::ops::Range;

use num_bigint::BigUint;
use num_traits::One;

/// Largest width whose labelings can be indexed by `u64`.
pub const MAX_WIDTH: usize = 63;

/// Total number of labelings of the cube `{0,1}^n`, i.e. `2^(2^n)`.
pub fn total_labelings(n: usize) -> BigUint {
    BigUint::one() << (1usize << n)
}

/// A single label assignment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Labeling {
    width: usize,
    index: u64,
}

impl Labeling {
    /// Creates the labeling with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `width > MAX_WIDTH` or `index >= 2^width`.
    pub fn new(width: usize, index: u64) -> Self {
        assert!(width <= MAX_WIDTH, "labeling width {} exceeds {}", width, MAX_WIDTH);
        assert!(index < (1u64 << width), "labeling index {} out of range for width {}", index, width);
        Labeling { width, index }
    }

    /// Builds the labeling from explicit labels (each 0 or 1).
    pub fn from_labels(labels: &[u8]) -> Self {
        let index = labels.iter().fold(0u64, |acc, &bit| {
            assert!(bit <= 1, "label must be 0 or 1, got {}", bit);
            (acc << 1) | bit as u64
        });
        Labeling::new(labels.len(), index)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Label of the `k`-th point.
    pub fn label(&self, k: usize) -> u8 {
        assert!(k < self.width, "point {} out of range for width {}", k, self.width);
        ((self.index >> (self.width - 1 - k)) & 1) as u8
    }

    /// All labels, in cube order.
    pub fn labels(&self) -> Vec<u8> {
        (0..self.width).map(|k| self.label(k)).collect()
    }

    /// The labeling with every label flipped.
    pub fn complement(&self) -> Self {
        let mask = (1u64 << self.width) - 1;
        Labeling {
            width: self.width,
            index: !self.index & mask,
        }
    }

    /// Number of points labeled `1`.
    pub fn count_ones(&self) -> u32 {
        self.index.count_ones()
    }

    /// Whether all labels are equal.
    pub fn is_constant(&self) -> bool {
        self.index == 0 || self.complement().index == 0
    }
}

impl fmt::Display for Labeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for k in 0..self.width {
            write!(f, "{}", self.label(k))?;
        }
        Ok(())
    }
}

/// A restartable sequence of labelings of one width, over a range of indices.
#[derive(Debug, Clone)]
pub struct Labelings {
    width: usize,
    indices: Range<u64>,
}

impl Labelings {
    /// All `2^width` labelings, in index order.
    pub fn all(width: usize) -> Self {
        assert!(width <= MAX_WIDTH, "labeling width {} exceeds {}", width, MAX_WIDTH);
        Labelings {
            width,
            indices: 0..(1u64 << width),
        }
    }

    /// Labelings with indices in `indices`.
    pub fn range(width: usize, indices: Range<u64>) -> Self {
        assert!(width <= MAX_WIDTH, "labeling width {} exceeds {}", width, MAX_WIDTH);
        assert!(indices.end <= (1u64 << width), "index range {:?} out of bounds", indices);
        Labelings { width, indices }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn indices(&self) -> Range<u64> {
        self.indices.clone()
    }
}

impl Iterator for Labelings {
    type Item = Labeling;

    fn next(&mut self) -> Option<Self::Item> {
        self.indices.next().map(|index| Labeling {
            width: self.width,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::ToBigUint;

    use super::*;

    #[test]
    fn test_labels_msb_first() {
        let xor = Labeling::new(4, 0b0110);
        assert_eq!(xor.labels(), vec![0, 1, 1, 0]);
        assert_eq!(xor.label(0), 0);
        assert_eq!(xor.label(1), 1);
        assert_eq!(xor.to_string(), "0110");

        let first_only = Labeling::new(4, 0b1000);
        assert_eq!(first_only.labels(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_from_labels() {
        assert_eq!(Labeling::from_labels(&[0, 1, 1, 0]), Labeling::new(4, 6));
        assert_eq!(Labeling::from_labels(&[1, 1]).index(), 3);
        let l = Labeling::new(8, 0b1011_0010);
        assert_eq!(Labeling::from_labels(&l.labels()), l);
    }

    #[test]
    fn test_complement() {
        let l = Labeling::new(4, 0b0110);
        assert_eq!(l.complement(), Labeling::new(4, 0b1001));
        assert_eq!(l.complement().complement(), l);
        assert_eq!(Labeling::new(4, 0).complement().index(), 15);
        assert!(Labeling::new(4, 0).is_constant());
        assert!(Labeling::new(4, 15).is_constant());
        assert!(!l.is_constant());
        assert_eq!(l.count_ones(), 2);
    }

    #[test]
    fn test_labelings_all() {
        let all: Vec<u64> = Labelings::all(2).map(|l| l.index()).collect();
        assert_eq!(all, vec![0, 1, 2, 3]);
        assert_eq!(Labelings::all(4).count(), 16);
        assert_eq!(Labelings::range(4, 8..16).next(), Some(Labeling::new(4, 8)));
    }

    #[test]
    fn test_total_labelings() {
        assert_eq!(total_labelings(1), 4.to_biguint().unwrap());
        assert_eq!(total_labelings(2), 16.to_biguint().unwrap());
        assert_eq!(total_labelings(4), 65536.to_biguint().unwrap());
        assert_eq!(total_labelings(6).to_string(), "18446744073709551616");
    }
}
