//! Linear Layer (Fully Connected)
//!
//! Performs an affine transformation of a single vector: `y = W x + b`
//!
//! ## Forward Pass
//!
//! ```text
//! Input:  x [in_features]
//! Weight: W [out_features, in_features]
//! Bias:   b [out_features]
//! Output: y = W x + b [out_features]
//! ```
//!
//! ## Backward Pass
//!
//! Using the chain rule:
//! ```text
//! grad_W[i][k] = grad_y[i] * x[k]
//! grad_b       = grad_y
//! grad_x[k]    = Σ_i W[i][k] * grad_y[i]
//! ```
//!
//! ## Why These Gradients?
//!
//! - **grad_W**: Each weight W[i,k] scales input x[k] into output y[i]
//! - **grad_b**: Each bias b[i] feeds output y[i] with slope 1
//! - **grad_x**: Needed to backprop to the previous layer
//!
//! ## Implementation Notes
//!
//! - Weights drawn from a symmetric uniform interval chosen by the caller
//! - Bias initialized to zero

use rand::Rng;
use rand_distr::Uniform;

use crate::tensor::Tensor;

/// Linear layer (fully connected)
#[derive(Clone, Debug)]
pub struct TrainableLinear {
    pub weight: Tensor,
    pub bias: Tensor,
}

impl TrainableLinear {
    /// Create a new linear layer
    ///
    /// # Arguments
    ///
    /// * `in_features` - Input dimension
    /// * `out_features` - Output dimension
    /// * `init` - Distribution each weight is drawn from
    /// * `rng` - Generator the weights are drawn with, in row-major order
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        init: &Uniform<f64>,
        rng: &mut R,
    ) -> Self {
        Self {
            weight: Tensor::random(vec![out_features, in_features], init, rng),
            bias: Tensor::zeros(vec![out_features]),
        }
    }

    /// Input dimension
    pub fn in_features(&self) -> usize {
        self.weight.shape[1]
    }

    /// Output dimension
    pub fn out_features(&self) -> usize {
        self.weight.shape[0]
    }

    /// Forward pass: `W x + b`
    pub fn forward(&self, x: &Tensor) -> Tensor {
        let mut y = self.weight.matvec(x);
        y.add_assign(&self.bias);
        y
    }

    /// Backward pass
    ///
    /// # Arguments
    ///
    /// * `grad_out` - Gradient from the next layer [out_features]
    /// * `x` - The input this layer saw in the forward pass [in_features]
    pub fn backward(&self, grad_out: &Tensor, x: &Tensor) -> LinearGradients {
        // grad_W = grad_out ⊗ x
        let weight = Tensor::outer(grad_out, x);

        // grad_b = grad_out
        let bias = grad_out.clone();

        // grad_x = W^T grad_out
        let x = self.weight.matvec_transposed(grad_out);

        LinearGradients { weight, bias, x }
    }
}

/// Gradients for linear layer
pub struct LinearGradients {
    pub weight: Tensor,
    pub bias: Tensor,
    pub x: Tensor, // Gradient to pass to previous layer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> TrainableLinear {
        // W = [[1, 2], [3, 4], [5, 6]], b = [0.5, 0, -0.5]
        TrainableLinear {
            weight: Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![3, 2]),
            bias: Tensor::new(vec![0.5, 0.0, -0.5], vec![3]),
        }
    }

    #[test]
    fn test_forward() {
        let x = Tensor::new(vec![1.0, -1.0], vec![2]);
        assert_eq!(layer().forward(&x).data, vec![-0.5, -1.0, -1.5]);
    }

    #[test]
    fn test_backward() {
        let x = Tensor::new(vec![2.0, 3.0], vec![2]);
        let grad_out = Tensor::new(vec![1.0, 0.0, -1.0], vec![3]);
        let grads = layer().backward(&grad_out, &x);

        assert_eq!(grads.weight.shape, vec![3, 2]);
        assert_eq!(grads.weight.data, vec![2.0, 3.0, 0.0, 0.0, -2.0, -3.0]);
        assert_eq!(grads.bias.data, vec![1.0, 0.0, -1.0]);
        // W^T grad_out = [1 - 5, 2 - 6]
        assert_eq!(grads.x.data, vec![-4.0, -4.0]);
    }

    #[test]
    fn test_new_shapes_and_zero_bias() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let init = Uniform::new(-0.1, 0.1).unwrap();
        let linear = TrainableLinear::new(6, 4, &init, &mut StdRng::seed_from_u64(3));
        assert_eq!(linear.weight.shape, vec![4, 6]);
        assert_eq!(linear.in_features(), 6);
        assert_eq!(linear.out_features(), 4);
        assert!(linear.bias.data.iter().all(|&b| b == 0.0));
        assert!(linear.weight.data.iter().all(|w| w.abs() <= 0.1));
    }
}
