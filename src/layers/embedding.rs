//! Embedding Layer
//!
//! Maps each context character to a learned vector and concatenates the
//! vectors in position order into one flat input for the hidden layer.
//!
//! ```text
//! indices: [i0, i1, i2]            (context = 3)
//! x_flat:  [E[i0] | E[i1] | E[i2]]  (length 3 * embed_dim)
//! ```
//!
//! ## Backward Pass
//!
//! The gradient of `x_flat` is cut back into `embed_dim`-wide slices and each
//! slice is *added* into the gradient row of the character at that position.
//! A character appearing twice in the same window receives both slices.

use rand::Rng;
use rand_distr::Uniform;

use crate::tensor::Tensor;

/// Character embedding table
#[derive(Clone, Debug)]
pub struct Embedding {
    /// Embedding weight matrix: [vocab_size, embed_dim]
    pub weight: Tensor,
}

impl Embedding {
    /// Create an embedding table with weights drawn from `init`
    pub fn new<R: Rng + ?Sized>(
        vocab_size: usize,
        embed_dim: usize,
        init: &Uniform<f64>,
        rng: &mut R,
    ) -> Self {
        Self {
            weight: Tensor::random(vec![vocab_size, embed_dim], init, rng),
        }
    }

    /// Embedding dimension
    pub fn embed_dim(&self) -> usize {
        self.weight.shape[1]
    }

    /// Forward pass: look up and concatenate embedding rows
    ///
    /// # Panics
    ///
    /// Panics if an index is outside the vocabulary.
    pub fn forward(&self, indices: &[usize]) -> Tensor {
        let embed_dim = self.embed_dim();
        let mut output = Vec::with_capacity(indices.len() * embed_dim);

        for &id in indices {
            assert!(
                id < self.weight.shape[0],
                "Token ID {} out of vocab range (vocab_size = {})",
                id,
                self.weight.shape[0]
            );
            output.extend_from_slice(self.weight.row(id));
        }

        Tensor::new(output, vec![indices.len() * embed_dim])
    }

    /// Backward pass: scatter-add the flat input gradient into table rows
    ///
    /// # Arguments
    ///
    /// * `grad_flat` - Gradient with respect to the concatenated input
    /// * `indices` - The indices the forward pass looked up
    ///
    /// # Returns
    ///
    /// Gradient for the whole table, zero for rows not in `indices`
    pub fn backward(&self, grad_flat: &Tensor, indices: &[usize]) -> Tensor {
        let embed_dim = self.embed_dim();
        assert_eq!(
            grad_flat.len(),
            indices.len() * embed_dim,
            "Embedding backward: gradient length mismatch"
        );

        let mut grad = Tensor::zeros_like(&self.weight);
        for (pos, &id) in indices.iter().enumerate() {
            let slice = &grad_flat.data[pos * embed_dim..(pos + 1) * embed_dim];
            for (g, &s) in grad.row_mut(id).iter_mut().zip(slice) {
                *g += s;
            }
        }
        grad
    }
}
