//! Activation Functions
//!
//! ReLU for the hidden layer and softmax + cross-entropy for the output.
//!
//! ## ReLU
//!
//! ```text
//! forward:  h = max(0, z)
//! backward: dz = dh   where z > 0
//!           dz = 0    where z <= 0
//! ```
//!
//! ReLU is not differentiable at zero; the gradient there is taken to be 0,
//! which is why the backward pass needs the *pre-activation* `z` and not `h`.
//!
//! ## Softmax + Cross-Entropy
//!
//! For probabilities `p = softmax(logits)` and target class `t`:
//!
//! ```text
//! loss     = -ln(p[t] + ε)
//! d_logits = p - onehot(t)
//! ```
//!
//! The combined derivative is what makes this pairing popular: the
//! exponentials and the logarithm cancel, leaving a simple subtraction.

use crate::tensor::Tensor;

/// Guard added inside the logarithm so that `p[t] == 0` gives a large but
/// finite loss instead of infinity
pub const LOG_EPSILON: f64 = 1e-12;

/// ReLU activation (forward pass): element-wise `max(0, z)`
pub fn relu_forward(z: &Tensor) -> Tensor {
    let result = z.data.iter().map(|&x| x.max(0.0)).collect();
    Tensor::new(result, z.shape.clone())
}

/// ReLU derivative (backward pass)
///
/// # Arguments
///
/// * `grad_out` - Gradient with respect to the activation output
/// * `z` - Pre-activation input saved by the forward pass
pub fn relu_backward(grad_out: &Tensor, z: &Tensor) -> Tensor {
    assert_eq!(grad_out.shape, z.shape, "relu_backward: shape mismatch");
    let grad = grad_out
        .data
        .iter()
        .zip(&z.data)
        .map(|(&g, &z_val)| if z_val <= 0.0 { 0.0 } else { g })
        .collect();
    Tensor::new(grad, z.shape.clone())
}

/// Cross-entropy of a probability vector against a target index
pub fn cross_entropy_loss(probs: &Tensor, target: usize) -> f64 {
    -(probs.data[target] + LOG_EPSILON).ln()
}

/// Gradient of cross-entropy with respect to the logits that produced `probs`
///
/// This is the only place the loss function's derivative enters backprop.
pub fn softmax_cross_entropy_backward(probs: &Tensor, target: usize) -> Tensor {
    assert!(
        target < probs.len(),
        "Target {} out of range (vocab_size = {})",
        target,
        probs.len()
    );
    let mut d_logits = probs.clone();
    d_logits.data[target] -= 1.0;
    d_logits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_forward_clamps_negatives() {
        let z = Tensor::new(vec![-1.0, 0.0, 2.5, -0.0], vec![2, 2]);
        let out = relu_forward(&z);
        assert_eq!(out.shape, vec![2, 2]);
        assert_eq!(out.data, vec![0.0, 0.0, 2.5, 0.0]);
    }

    #[test]
    fn test_relu_backward_masks_non_positive() {
        let z = Tensor::new(vec![-2.0, 0.0, 1e-9, 3.0], vec![4]);
        let grad = Tensor::new(vec![1.0, 1.0, 1.0, 1.0], vec![4]);
        assert_eq!(relu_backward(&grad, &z).data, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(relu_forward(&z).data, vec![0.0, 0.0, 1e-9, 3.0]);
    }

    #[test]
    fn test_cross_entropy_of_certain_prediction_is_near_zero() {
        let probs = Tensor::new(vec![0.0, 1.0], vec![2]);
        assert!(cross_entropy_loss(&probs, 1).abs() < 1e-9);
    }

    #[test]
    fn test_cross_entropy_of_zero_probability_is_finite() {
        let probs = Tensor::new(vec![0.0, 1.0], vec![2]);
        let loss = cross_entropy_loss(&probs, 0);
        assert!(loss.is_finite());
        assert!((loss - (-LOG_EPSILON.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_cross_entropy_backward() {
        let probs = Tensor::new(vec![0.2, 0.5, 0.3], vec![3]);
        let d = softmax_cross_entropy_backward(&probs, 1);
        assert_eq!(d.data, vec![0.2, -0.5, 0.3]);
        // Gradient of a normalized distribution sums to zero
        assert!(d.data.iter().sum::<f64>().abs() < 1e-12);
    }
}
