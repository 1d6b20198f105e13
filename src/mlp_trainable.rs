//! Trainable Character MLP
//!
//! The network at the heart of the crate, with hand-coded forward and
//! backward passes.
//!
//! ## Architecture
//!
//! ```text
//! indices [context]
//!   → Embedding lookup + concat   x_flat     [context * embed_dim]
//!   → Linear (W1, b1)             hidden_raw [hidden_dim]
//!   → ReLU                        hidden     [hidden_dim]
//!   → Linear (W2, b2)             logits     [vocab_size]
//!   → Softmax                     probs      [vocab_size]
//! ```
//!
//! ## Backpropagation
//!
//! The backward pass walks the same chain in reverse. Each stage consumes only
//! gradients computed by the stage after it:
//!
//! ```text
//! d_logits   = probs - onehot(target)
//! dW2, db2   = d_logits ⊗ hidden, d_logits
//! d_hidden   = W2ᵀ d_logits, zeroed where hidden_raw <= 0
//! dW1, db1   = d_hidden ⊗ x_flat, d_hidden
//! d_x_flat   = W1ᵀ d_hidden
//! dE         = scatter-add of d_x_flat slices into rows
//! ```
//!
//! Both passes are pure functions of the parameters and their inputs; only
//! [`crate::optimizer::sgd_update`] mutates the network.

use rand::Rng;
use rand_distr::Uniform;

use crate::error::{ModelError, ModelResult};
use crate::gradients::MLPGradients;
use crate::layers::{
    relu_backward, relu_forward, softmax_cross_entropy_backward, Embedding, TrainableLinear,
};
use crate::model::{ModelConfig, DENSE_INIT_SCALE, EMBEDDING_INIT_SCALE};
use crate::tensor::Tensor;

/// Embedding → dense+ReLU → dense+softmax network
#[derive(Clone, Debug)]
pub struct TrainableCharMLP {
    pub(crate) embedding: Embedding,
    pub(crate) hidden: TrainableLinear,
    pub(crate) output: TrainableLinear,
    pub(crate) context: usize,
}

/// Intermediate values of one forward pass, consumed by the matching
/// backward pass for the same input
#[derive(Clone, Debug)]
pub struct ForwardCache {
    /// Vocabulary indices of the context window
    pub x_indices: Vec<usize>,
    /// Concatenated embeddings [context * embed_dim]
    pub x_flat: Tensor,
    /// Hidden pre-activation [hidden_dim]; its sign gates the ReLU gradient
    pub hidden_raw: Tensor,
    /// Hidden activation after ReLU [hidden_dim]
    pub hidden: Tensor,
    /// Output probabilities [vocab_size]
    pub probs: Tensor,
}

fn uniform(scale: f64) -> ModelResult<Uniform<f64>> {
    Uniform::new(-scale, scale).map_err(|e| {
        ModelError::InvalidConfiguration(format!("init interval ±{scale}: {e}"))
    })
}

impl TrainableCharMLP {
    /// Create a network with freshly initialized parameters
    ///
    /// Draws E, then W1, then W2 from `rng`; biases start at zero.
    pub fn new<R: Rng + ?Sized>(
        vocab_size: usize,
        config: &ModelConfig,
        rng: &mut R,
    ) -> ModelResult<Self> {
        let embed_init = uniform(EMBEDDING_INIT_SCALE)?;
        let dense_init = uniform(DENSE_INIT_SCALE)?;

        let embedding = Embedding::new(vocab_size, config.embed_dim, &embed_init, rng);
        let hidden = TrainableLinear::new(config.input_dim(), config.hidden_dim, &dense_init, rng);
        let output = TrainableLinear::new(config.hidden_dim, vocab_size, &dense_init, rng);

        Ok(Self {
            embedding,
            hidden,
            output,
            context: config.context,
        })
    }

    /// Number of output classes
    pub fn vocab_size(&self) -> usize {
        self.output.out_features()
    }

    /// Total number of trainable scalars
    pub fn num_parameters(&self) -> usize {
        self.embedding.weight.len()
            + self.hidden.weight.len()
            + self.hidden.bias.len()
            + self.output.weight.len()
            + self.output.bias.len()
    }

    /// Embedding matrix E [vocab_size, embed_dim]
    pub fn embedding(&self) -> &Tensor {
        &self.embedding.weight
    }

    /// Hidden layer (W1, b1)
    pub fn hidden_layer(&self) -> &TrainableLinear {
        &self.hidden
    }

    /// Output layer (W2, b2)
    pub fn output_layer(&self) -> &TrainableLinear {
        &self.output
    }

    /// Forward pass
    ///
    /// # Returns
    ///
    /// Tuple of (probabilities, cache) for the next character
    ///
    /// # Panics
    ///
    /// Panics if `x_indices` is not exactly `context` long or holds an index
    /// outside the vocabulary. Callers validate user input before this point.
    pub fn forward(&self, x_indices: &[usize]) -> (Tensor, ForwardCache) {
        assert_eq!(
            x_indices.len(),
            self.context,
            "Forward pass expects exactly {} indices",
            self.context
        );

        // 1. Embedding lookup, flattened in position order
        let x_flat = self.embedding.forward(x_indices);

        // 2-3. Hidden layer and ReLU
        let hidden_raw = self.hidden.forward(&x_flat);
        let hidden = relu_forward(&hidden_raw);

        // 4-5. Output logits and softmax
        let logits = self.output.forward(&hidden);
        let probs = logits.softmax();

        let cache = ForwardCache {
            x_indices: x_indices.to_vec(),
            x_flat,
            hidden_raw,
            hidden,
            probs: probs.clone(),
        };
        (probs, cache)
    }

    /// Backward pass for one (input, target) pair
    ///
    /// # Arguments
    ///
    /// * `cache` - Cache returned by [`forward`](Self::forward) for this input
    /// * `target` - Vocabulary index of the true next character
    pub fn backward(&self, cache: &ForwardCache, target: usize) -> MLPGradients {
        // Softmax + cross-entropy
        let d_logits = softmax_cross_entropy_backward(&cache.probs, target);

        // Output layer: dW2, db2 and the gradient flowing into the hidden state
        let output_grads = self.output.backward(&d_logits, &cache.hidden);

        // ReLU
        let d_hidden = relu_backward(&output_grads.x, &cache.hidden_raw);

        // Hidden layer: dW1, db1 and the gradient of the flat input
        let hidden_grads = self.hidden.backward(&d_hidden, &cache.x_flat);

        // Embedding rows
        let d_embedding = self.embedding.backward(&hidden_grads.x, &cache.x_indices);

        MLPGradients {
            embedding: d_embedding,
            hidden_weight: hidden_grads.weight,
            hidden_bias: hidden_grads.bias,
            output_weight: output_grads.weight,
            output_bias: output_grads.bias,
        }
    }
}
