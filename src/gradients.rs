//! Gradient Utilities
//!
//! [`MLPGradients`] holds one gradient tensor per parameter tensor. The trainer
//! uses it twice: once per training pair (the output of backprop) and once as
//! the running accumulator that becomes the mean gradient of the epoch.
//!
//! ## Full-Batch Averaging
//!
//! ```text
//! total = Σ_pairs backward(pair)
//! mean  = total / num_pairs
//! ```
//!
//! Dividing by the number of pairs keeps the step size independent of how
//! long the training text is.
//!
//! ## Gradient Norm
//!
//! [`compute_grad_norm`] reduces all gradients to a single number,
//! `√(Σ g²)`, which is logged during training to watch for vanishing or
//! exploding updates.

use crate::mlp_trainable::TrainableCharMLP;
use crate::tensor::Tensor;

/// Gradients for every parameter of [`TrainableCharMLP`]
#[derive(Clone, Debug)]
pub struct MLPGradients {
    /// dE [vocab_size, embed_dim]
    pub embedding: Tensor,
    /// dW1 [hidden_dim, context * embed_dim]
    pub hidden_weight: Tensor,
    /// db1 [hidden_dim]
    pub hidden_bias: Tensor,
    /// dW2 [vocab_size, hidden_dim]
    pub output_weight: Tensor,
    /// db2 [vocab_size]
    pub output_bias: Tensor,
}

impl MLPGradients {
    /// Zero gradients with the shapes of `model`'s parameters
    pub fn zeros_like(model: &TrainableCharMLP) -> Self {
        Self {
            embedding: Tensor::zeros_like(&model.embedding.weight),
            hidden_weight: Tensor::zeros_like(&model.hidden.weight),
            hidden_bias: Tensor::zeros_like(&model.hidden.bias),
            output_weight: Tensor::zeros_like(&model.output.weight),
            output_bias: Tensor::zeros_like(&model.output.bias),
        }
    }

    /// Add `other` element-wise into `self`
    pub fn accumulate(&mut self, other: &MLPGradients) {
        self.embedding.add_assign(&other.embedding);
        self.hidden_weight.add_assign(&other.hidden_weight);
        self.hidden_bias.add_assign(&other.hidden_bias);
        self.output_weight.add_assign(&other.output_weight);
        self.output_bias.add_assign(&other.output_bias);
    }

    /// Multiply every gradient by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.embedding.scale_assign(factor);
        self.hidden_weight.scale_assign(factor);
        self.hidden_bias.scale_assign(factor);
        self.output_weight.scale_assign(factor);
        self.output_bias.scale_assign(factor);
    }
}

/// Compute the L2 norm of all gradients
pub fn compute_grad_norm(grads: &MLPGradients) -> f64 {
    let sum_sq = grads.embedding.sum_squares()
        + grads.hidden_weight.sum_squares()
        + grads.hidden_bias.sum_squares()
        + grads.output_weight.sum_squares()
        + grads.output_bias.sum_squares();
    sum_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network() -> TrainableCharMLP {
        let config = ModelConfig {
            context: 2,
            embed_dim: 3,
            hidden_dim: 4,
            ..ModelConfig::default()
        };
        TrainableCharMLP::new(5, &config, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_zeros_like_has_zero_norm() {
        let grads = MLPGradients::zeros_like(&network());
        assert_eq!(grads.embedding.shape, vec![5, 3]);
        assert_eq!(grads.hidden_weight.shape, vec![4, 6]);
        assert_eq!(compute_grad_norm(&grads), 0.0);
    }

    #[test]
    fn test_accumulate_then_average() {
        let net = network();
        let (_, cache_a) = net.forward(&[0, 1]);
        let (_, cache_b) = net.forward(&[3, 3]);
        let a = net.backward(&cache_a, 2);
        let b = net.backward(&cache_b, 4);

        let mut total = MLPGradients::zeros_like(&net);
        total.accumulate(&a);
        total.accumulate(&b);
        total.scale(0.5);

        for k in 0..total.output_bias.len() {
            let expected = (a.output_bias.data[k] + b.output_bias.data[k]) * 0.5;
            assert!((total.output_bias.data[k] - expected).abs() < 1e-15);
        }
        for k in 0..total.hidden_weight.len() {
            let expected = (a.hidden_weight.data[k] + b.hidden_weight.data[k]) * 0.5;
            assert!((total.hidden_weight.data[k] - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_grad_norm() {
        let mut grads = MLPGradients::zeros_like(&network());
        grads.output_bias.data[0] = 3.0;
        grads.embedding.data[1] = 4.0;
        assert!((compute_grad_norm(&grads) - 5.0).abs() < 1e-12);
    }
}
