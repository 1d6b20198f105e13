//! Gradient Descent
//!
//! The update rule is plain full-batch gradient descent:
//!
//! ```text
//! θ = θ - α * ḡ
//! ```
//!
//! where `ḡ` is the gradient averaged over the whole dataset and `α` is the
//! learning rate. There is no momentum or per-parameter state, so one call
//! fully describes one training step.

use crate::gradients::MLPGradients;
use crate::mlp_trainable::TrainableCharMLP;

/// Apply one gradient-descent step to every parameter of `model`
///
/// # Arguments
///
/// * `model` - Network to update in place
/// * `grads` - Gradients with the same shapes as the parameters
/// * `lr` - Learning rate
pub fn sgd_update(model: &mut TrainableCharMLP, grads: &MLPGradients, lr: f64) {
    model.embedding.weight.sub_scaled_assign(&grads.embedding, lr);
    model.hidden.weight.sub_scaled_assign(&grads.hidden_weight, lr);
    model.hidden.bias.sub_scaled_assign(&grads.hidden_bias, lr);
    model.output.weight.sub_scaled_assign(&grads.output_weight, lr);
    model.output.bias.sub_scaled_assign(&grads.output_bias, lr);
}
