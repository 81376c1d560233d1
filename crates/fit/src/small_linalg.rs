//! Stack-allocated small linear algebra for least-squares subproblems.
//!
//! The curve models have at most three parameters, so normal matrices and
//! triangular factors fit comfortably on the stack.

/// Stack-allocated vector of dimension `R`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SmallVec<const R: usize> {
    pub(crate) data: [f64; R],
}

/// Stack-allocated R x R matrix stored in column-major order.
///
/// `cols[c][r]` = element at row r, column c.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SmallMat<const R: usize> {
    pub(crate) cols: [[f64; R]; R],
}

impl<const R: usize> SmallVec<R> {
    /// Returns a zero-initialized vector.
    #[inline(always)]
    pub(crate) fn zeros() -> Self {
        Self { data: [0.0; R] }
    }
}

impl<const R: usize> SmallMat<R> {
    /// Returns a zero-initialized matrix.
    #[inline(always)]
    pub(crate) fn zeros() -> Self {
        Self {
            cols: [[0.0; R]; R],
        }
    }

    /// Returns the element at `(row, col)`.
    #[inline(always)]
    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.cols[col][row]
    }

    /// Sets the element at `(row, col)` to `val`.
    #[inline(always)]
    pub(crate) fn set(&mut self, row: usize, col: usize, val: f64) {
        self.cols[col][row] = val;
    }

    /// Computes `self * selfᵀ`.
    pub(crate) fn mul_self_transpose(&self) -> SmallMat<R> {
        let mut out = SmallMat::zeros();
        for i in 0..R {
            for j in 0..R {
                let mut sum = 0.0;
                for k in 0..R {
                    sum += self.get(i, k) * self.get(j, k);
                }
                out.set(i, j, sum);
            }
        }
        out
    }

    /// Diagonal entries.
    pub(crate) fn diagonal(&self) -> SmallVec<R> {
        let mut d = SmallVec::zeros();
        for i in 0..R {
            d.data[i] = self.get(i, i);
        }
        d
    }
}

/// Row-by-row QR factorisation of a K-column least-squares problem using
/// Givens rotations.
///
/// Rows are folded into an upper-triangular `R` and the rotated right-hand
/// side `Qᵀy`; the component of `y` orthogonal to the column space
/// accumulates into the residual sum of squares.
pub(crate) struct GivensQr<const K: usize> {
    r: SmallMat<K>,
    qty: SmallVec<K>,
    rss: f64,
    rows: usize,
}

impl<const K: usize> GivensQr<K> {
    pub(crate) fn new() -> Self {
        Self {
            r: SmallMat::zeros(),
            qty: SmallVec::zeros(),
            rss: 0.0,
            rows: 0,
        }
    }

    /// Folds the equation `row · x ≈ rhs` into the factorisation.
    pub(crate) fn add_row(&mut self, mut row: [f64; K], mut rhs: f64) {
        for j in 0..K {
            if row[j] == 0.0 {
                continue;
            }
            let rjj = self.r.get(j, j);
            let norm = rjj.hypot(row[j]);
            let (c, s) = (rjj / norm, row[j] / norm);
            self.r.set(j, j, norm);
            for k in (j + 1)..K {
                let rjk = self.r.get(j, k);
                self.r.set(j, k, c * rjk + s * row[k]);
                row[k] = c * row[k] - s * rjk;
            }
            let qj = self.qty.data[j];
            self.qty.data[j] = c * qj + s * rhs;
            rhs = c * rhs - s * qj;
            row[j] = 0.0;
        }
        self.rss += rhs * rhs;
        self.rows += 1;
    }

    /// Residual sum of squares of the least-squares solution.
    pub(crate) fn rss(&self) -> f64 {
        self.rss
    }

    /// Whether `R` is numerically full rank.
    fn is_full_rank(&self) -> bool {
        let scale = (0..K).map(|j| self.r.get(j, j).abs()).fold(0.0, f64::max);
        let tol = scale * 1e-12 * K as f64;
        self.rows >= K && (0..K).all(|j| self.r.get(j, j).abs() > tol)
    }

    /// Least-squares solution, `None` if the columns are (nearly) dependent.
    pub(crate) fn solve(&self) -> Option<SmallVec<K>> {
        if !self.is_full_rank() {
            return None;
        }
        let mut x = SmallVec::zeros();
        for j in (0..K).rev() {
            let mut sum = self.qty.data[j];
            for k in (j + 1)..K {
                sum -= self.r.get(j, k) * x.data[k];
            }
            x.data[j] = sum / self.r.get(j, j);
        }
        Some(x)
    }

    /// `(AᵀA)⁻¹ = R⁻¹ R⁻ᵀ`, `None` if rank deficient.
    pub(crate) fn inverse_normal_matrix(&self) -> Option<SmallMat<K>> {
        if !self.is_full_rank() {
            return None;
        }
        let mut rinv = SmallMat::<K>::zeros();
        for c in 0..K {
            for j in (0..=c).rev() {
                let mut sum = if j == c { 1.0 } else { 0.0 };
                for k in (j + 1)..=c {
                    sum -= self.r.get(j, k) * rinv.get(k, c);
                }
                rinv.set(j, c, sum / self.r.get(j, j));
            }
        }
        Some(rinv.mul_self_transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line_is_recovered() {
        let mut qr = GivensQr::<2>::new();
        for x in [0.0, 1.0, 2.0, 5.0] {
            qr.add_row([x, 1.0], 3.0 * x + 2.0);
        }
        let sol = qr.solve().unwrap();
        assert_relative_eq!(sol.data[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(sol.data[1], 2.0, epsilon = 1e-12);
        assert!(qr.rss() < 1e-20);
    }

    #[test]
    fn rss_matches_residuals() {
        // y = [1, 2, 2] on x = [0, 1, 2]: OLS slope 0.5, intercept 7/6.
        let mut qr = GivensQr::<2>::new();
        for (x, y) in [(0.0, 1.0), (1.0, 2.0), (2.0, 2.0)] {
            qr.add_row([x, 1.0], y);
        }
        let sol = qr.solve().unwrap();
        assert_relative_eq!(sol.data[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(sol.data[1], 7.0 / 6.0, epsilon = 1e-12);
        let rss: f64 = [(0.0, 1.0), (1.0, 2.0), (2.0, 2.0)]
            .iter()
            .map(|(x, y)| (y - 0.5 * x - 7.0 / 6.0_f64).powi(2))
            .sum();
        assert_relative_eq!(qr.rss(), rss, epsilon = 1e-12);
    }

    #[test]
    fn dependent_columns_are_detected() {
        let mut qr = GivensQr::<2>::new();
        for y in [1.0, 2.0, 3.0] {
            qr.add_row([1.0, 1.0], y);
        }
        assert!(qr.solve().is_none());
        assert!(qr.inverse_normal_matrix().is_none());
    }

    #[test]
    fn inverse_normal_matrix_matches_closed_form() {
        // AᵀA for rows [x, 1] with x = 0, 1, 2: [[5, 3], [3, 3]], det 6.
        let mut qr = GivensQr::<2>::new();
        for x in [0.0, 1.0, 2.0] {
            qr.add_row([x, 1.0], 0.0);
        }
        let inv = qr.inverse_normal_matrix().unwrap();
        assert_relative_eq!(inv.get(0, 0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(inv.get(0, 1), -0.5, epsilon = 1e-12);
        assert_relative_eq!(inv.get(1, 1), 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(inv.diagonal().data[1], 5.0 / 6.0, epsilon = 1e-12);
    }
}
