//! Neural Network Layers
//!
//! The three building blocks of the character model, each with an explicit
//! forward and backward pass.
//!
//! ## Layers
//!
//! - **embedding**: Per-character vector lookup, concatenated over the context
//! - **linear**: Fully connected layer `y = W x + b`
//! - **activation**: ReLU, softmax output and its cross-entropy gradient
//!
//! ## Design Pattern
//!
//! Each trainable layer follows a consistent pattern:
//!
//! ```rust,ignore
//! impl TrainableLayer {
//!     pub fn forward(&self, x: &Tensor) -> Tensor { }
//!     pub fn backward(&self, grad_out: &Tensor, x: &Tensor) -> Gradients { }
//! }
//! ```
//!
//! The backward pass receives the same input the forward pass saw, taken
//! from the model's forward cache, so no layer keeps hidden state between
//! calls.

pub mod activation;
pub mod embedding;
pub mod linear;

pub use activation::{
    cross_entropy_loss, relu_backward, relu_forward, softmax_cross_entropy_backward, LOG_EPSILON,
};
pub use embedding::Embedding;
pub use linear::{LinearGradients, TrainableLinear};
