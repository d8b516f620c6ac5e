//! The Boolean cube `{0,1}^n` as an ordered, restartable sequence of points.
//!
//! Points are listed in lexicographic product order with `0` before `1`:
//! point `k` is the binary expansion of `k`, most significant bit first.
//!
//! ```text
//! n = 2:  (0,0) (0,1) (1,0) (1,1)
//! ```

/// The Boolean cube of dimension `n`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BooleanCube {
    n: usize,
}

impl BooleanCube {
    /// Creates the cube `{0,1}^n`.
    ///
    /// # Panics
    ///
    /// Panics if `2^n` points cannot be indexed by `usize`.
    pub fn new(n: usize) -> Self {
        assert!(n < usize::BITS as usize, "cube dimension {} is too large", n);
        BooleanCube { n }
    }

    /// Dimension (number of variables).
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of points, `2^n`.
    pub fn len(&self) -> usize {
        1 << self.n
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `k`-th point in cube order.
    pub fn point(&self, k: usize) -> Vec<u8> {
        assert!(k < self.len(), "point index {} out of range", k);
        (0..self.n).rev().map(|i| ((k >> i) & 1) as u8).collect()
    }

    /// Iterates over all points in cube order.
    pub fn points(&self) -> Points {
        Points { cube: *self, next: 0 }
    }

    /// All points, collected.
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.points().collect()
    }
}

impl IntoIterator for BooleanCube {
    type Item = Vec<u8>;
    type IntoIter = Points;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

/// Iterator over the points of a [`BooleanCube`].
#[derive(Debug, Clone)]
pub struct Points {
    cube: BooleanCube,
    next: usize,
}

impl Iterator for Points {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.cube.len() {
            return None;
        }
        let point = self.cube.point(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.cube.len() - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Points {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_order() {
        let cube = BooleanCube::new(2);
        assert_eq!(cube.len(), 4);
        assert_eq!(cube.to_matrix(), vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn test_cube_zero_dim() {
        let cube = BooleanCube::new(0);
        assert_eq!(cube.len(), 1);
        assert_eq!(cube.to_matrix(), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_cube_points_distinct_and_restartable() {
        let cube = BooleanCube::new(4);
        let points = cube.points();
        assert_eq!(points.len(), 16);

        let first: Vec<_> = points.clone().collect();
        let second: Vec<_> = points.collect();
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, first, "cube order must be lexicographic and duplicate-free");
    }

    #[test]
    fn test_cube_point() {
        let cube = BooleanCube::new(3);
        assert_eq!(cube.point(0), vec![0, 0, 0]);
        assert_eq!(cube.point(1), vec![0, 0, 1]);
        assert_eq!(cube.point(6), vec![1, 1, 0]);
    }
}
