//! Tensor Operations
//!
//! A deliberately small dense tensor type for a network that only ever needs
//! vectors and matrices. Every operation checks shapes and spells out its loops
//! so the arithmetic stays inspectable.
//!
//! ## Core Concepts
//!
//! - **Data**: Flat `Vec<f64>` storing all elements in row-major order
//! - **Shape**: `[n]` for a vector, `[rows, cols]` for a matrix
//! - **Strides**: Step sizes for each dimension to compute flat indices
//!
//! ## Why f64?
//!
//! The model is tiny, so the cost of double precision is irrelevant, and the
//! probability vectors it produces are expected to sum to one within `1e-9`.
//!
//! ## Example
//!
//! ```rust
//! use tinylm::Tensor;
//!
//! let w = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
//! let x = Tensor::new(vec![1.0, 0.0, -1.0], vec![3]);
//! let y = w.matvec(&x);
//! assert_eq!(y.data, vec![-2.0, -2.0]);
//! ```

use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// A dense vector or matrix of `f64` values
///
/// # Memory Layout
///
/// For shape `[2, 3]`, data is stored as
/// `[row0_col0, row0_col1, row0_col2, row1_col0, row1_col1, row1_col2]`
/// and strides are `[3, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    /// Flat storage of all tensor elements
    pub data: Vec<f64>,
    /// Shape of the tensor (dimensions)
    pub shape: Vec<usize>,
    /// Strides for each dimension (computed from shape)
    pub strides: Vec<usize>,
}

impl Tensor {
    /// Create a new tensor with given data and shape
    ///
    /// # Panics
    ///
    /// Panics if the product of shape dimensions doesn't equal data length
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Self {
        let expected_size: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected_size,
            "Data length ({}) doesn't match shape {:?} (expected {})",
            data.len(),
            shape,
            expected_size
        );

        let strides = Self::compute_strides(&shape);
        Self {
            data,
            shape,
            strides,
        }
    }

    /// Create a tensor filled with zeros
    ///
    /// ```rust
    /// # use tinylm::Tensor;
    /// let tensor = Tensor::zeros(vec![3, 4]);
    /// assert_eq!(tensor.data.len(), 12);
    /// assert!(tensor.data.iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size: usize = shape.iter().product();
        Self::new(vec![0.0; size], shape)
    }

    /// Create a tensor of the same shape as `other`, filled with zeros
    pub fn zeros_like(other: &Tensor) -> Self {
        Self::zeros(other.shape.clone())
    }

    /// Create a tensor whose elements are drawn independently from `dist`
    ///
    /// Elements are drawn in row-major order, so the same generator state
    /// always produces the same tensor.
    pub fn random<R: Rng + ?Sized>(shape: Vec<usize>, dist: &Uniform<f64>, rng: &mut R) -> Self {
        let size: usize = shape.iter().product();
        let data = (0..size).map(|_| dist.sample(rng)).collect();
        Self::new(data, shape)
    }

    /// Compute strides from shape (row-major layout)
    fn compute_strides(shape: &[usize]) -> Vec<usize> {
        let mut strides = vec![1; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        strides
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn matrix_dims(&self) -> (usize, usize) {
        assert_eq!(
            self.shape.len(),
            2,
            "Expected a matrix, got shape {:?}",
            self.shape
        );
        (self.shape[0], self.shape[1])
    }

    fn assert_vector(&self, len: usize, what: &str) {
        assert_eq!(
            self.shape,
            vec![len],
            "{}: expected vector of length {}, got shape {:?}",
            what,
            len,
            self.shape
        );
    }

    /// Borrow row `i` of a matrix
    pub fn row(&self, i: usize) -> &[f64] {
        let (_, cols) = self.matrix_dims();
        &self.data[i * self.strides[0]..i * self.strides[0] + cols]
    }

    /// Mutably borrow row `i` of a matrix
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let (_, cols) = self.matrix_dims();
        let start = i * self.strides[0];
        &mut self.data[start..start + cols]
    }

    /// Matrix-vector product
    ///
    /// For `W` of shape `[m, n]` and `x` of shape `[n]`:
    /// `y[i] = Σ_k W[i,k] * x[k]`, result shape `[m]`.
    pub fn matvec(&self, x: &Tensor) -> Tensor {
        let (rows, cols) = self.matrix_dims();
        x.assert_vector(cols, "matvec");

        let result = (0..rows)
            .map(|i| {
                let mut sum = 0.0;
                for (w, v) in self.row(i).iter().zip(&x.data) {
                    sum += w * v;
                }
                sum
            })
            .collect();
        Tensor::new(result, vec![rows])
    }

    /// Transposed matrix-vector product
    ///
    /// For `W` of shape `[m, n]` and `v` of shape `[m]`:
    /// `y[k] = Σ_i W[i,k] * v[i]`, result shape `[n]`.
    ///
    /// The sum runs over `i` in ascending order, row by row.
    pub fn matvec_transposed(&self, v: &Tensor) -> Tensor {
        let (rows, cols) = self.matrix_dims();
        v.assert_vector(rows, "matvec_transposed");

        let mut result = vec![0.0; cols];
        for (i, &v_i) in v.data.iter().enumerate() {
            for (r, &w) in result.iter_mut().zip(self.row(i)) {
                *r += w * v_i;
            }
        }
        Tensor::new(result, vec![cols])
    }

    /// Outer product of two vectors
    ///
    /// For `a` of shape `[m]` and `b` of shape `[n]`: `C[i,j] = a[i] * b[j]`.
    pub fn outer(a: &Tensor, b: &Tensor) -> Tensor {
        assert_eq!(a.shape.len(), 1, "outer: `a` must be a vector");
        assert_eq!(b.shape.len(), 1, "outer: `b` must be a vector");

        let mut result = Vec::with_capacity(a.len() * b.len());
        for &a_i in &a.data {
            for &b_j in &b.data {
                result.push(a_i * b_j);
            }
        }
        Tensor::new(result, vec![a.len(), b.len()])
    }

    /// In-place element-wise addition (shapes must match)
    pub fn add_assign(&mut self, other: &Tensor) {
        assert_eq!(self.shape, other.shape, "Shapes must match for addition");
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }

    /// In-place `self -= scale * other`, the gradient-descent step
    pub fn sub_scaled_assign(&mut self, other: &Tensor, scale: f64) {
        assert_eq!(self.shape, other.shape, "Shapes must match for update");
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= scale * b;
        }
    }

    /// Multiply all elements by a scalar in place
    pub fn scale_assign(&mut self, scalar: f64) {
        for x in &mut self.data {
            *x *= scalar;
        }
    }

    /// Numerically stable softmax over a vector
    ///
    /// Subtracts the maximum before exponentiating, which leaves the result
    /// unchanged but keeps every `exp` argument at or below zero.
    ///
    /// ```rust
    /// # use tinylm::Tensor;
    /// let probs = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).softmax();
    /// assert!((probs.data.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    /// ```
    pub fn softmax(&self) -> Tensor {
        assert_eq!(self.shape.len(), 1, "softmax expects a vector");

        let max = self.data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let exp_values: Vec<f64> = self.data.iter().map(|&x| (x - max).exp()).collect();
        let sum: f64 = exp_values.iter().sum();
        let result = exp_values.iter().map(|&e| e / sum).collect();

        Tensor::new(result, self.shape.clone())
    }

    /// Index of the largest element; the first one wins on ties
    ///
    /// Returns `None` for an empty tensor.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &x) in self.data.iter().enumerate() {
            match best {
                Some((_, b)) if x <= b => {}
                _ => best = Some((i, x)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Sum of squared elements
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().map(|&x| x * x).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_strides() {
        let t = Tensor::zeros(vec![2, 3]);
        assert_eq!(t.strides, vec![3, 1]);
        let v = Tensor::zeros(vec![5]);
        assert_eq!(v.strides, vec![1]);
    }

    #[test]
    #[should_panic(expected = "doesn't match shape")]
    fn test_new_rejects_bad_shape() {
        Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]);
    }

    #[test]
    fn test_matvec() {
        let w = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
        let x = Tensor::new(vec![1.0, 1.0], vec![2]);
        assert_eq!(w.matvec(&x).data, vec![3.0, 7.0]);
    }

    #[test]
    fn test_matvec_transposed() {
        // W = [[1, 2, 3], [4, 5, 6]], v = [1, -1] -> W^T v = [-3, -3, -3]
        let w = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
        let v = Tensor::new(vec![1.0, -1.0], vec![2]);
        let y = w.matvec_transposed(&v);
        assert_eq!(y.shape, vec![3]);
        assert_eq!(y.data, vec![-3.0, -3.0, -3.0]);
    }

    #[test]
    #[should_panic(expected = "matvec")]
    fn test_matvec_shape_mismatch_panics() {
        let w = Tensor::zeros(vec![2, 3]);
        w.matvec(&Tensor::zeros(vec![2]));
    }

    #[test]
    fn test_outer() {
        let a = Tensor::new(vec![1.0, 2.0], vec![2]);
        let b = Tensor::new(vec![3.0, 4.0, 5.0], vec![3]);
        let c = Tensor::outer(&a, &b);
        assert_eq!(c.shape, vec![2, 3]);
        assert_eq!(c.row(1), &[6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_add_and_update() {
        let mut a = Tensor::new(vec![1.0, 2.0], vec![2]);
        let b = Tensor::new(vec![0.5, 0.5], vec![2]);
        a.add_assign(&b);
        assert_eq!(a.data, vec![1.5, 2.5]);
        a.sub_scaled_assign(&b, 1.0);
        a.sub_scaled_assign(&b, 2.0);
        assert_eq!(a.data, vec![0.0, 1.0]);

        a.scale_assign(3.0);
        assert_eq!(a.data, vec![0.0, 3.0]);
    }

    #[test]
    fn test_softmax_is_distribution() {
        let x = Tensor::new(vec![1000.0, 999.0, -1000.0, 0.0], vec![4]);
        let p = x.softmax();
        assert!(p.data.iter().all(|&v| v >= 0.0 && v.is_finite()));
        assert!((p.data.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p.data[0] > p.data[1]);
    }

    #[test]
    fn test_softmax_uniform_for_equal_logits() {
        let p = Tensor::zeros(vec![4]).softmax();
        for &v in &p.data {
            assert!((v - 0.25).abs() < 1e-15);
        }
    }

    #[test]
    fn test_argmax_first_wins_on_tie() {
        let x = Tensor::new(vec![0.1, 0.4, 0.4, 0.1], vec![4]);
        assert_eq!(x.argmax(), Some(1));
        assert_eq!(Tensor::zeros(vec![0]).argmax(), None);
    }

    #[test]
    fn test_random_is_reproducible_and_bounded() {
        let dist = Uniform::new(-0.5, 0.5).unwrap();
        let a = Tensor::random(vec![4, 3], &dist, &mut StdRng::seed_from_u64(7));
        let b = Tensor::random(vec![4, 3], &dist, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.data.iter().all(|&v| (-0.5..0.5).contains(&v)));
    }
}
