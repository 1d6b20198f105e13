//! TinyLM: A Character-Level Language Model From Scratch
//!
//! A small next-character predictor trained with hand-written
//! backpropagation. Every gradient is derived and coded by hand, so the whole
//! learning loop can be read top to bottom.
//!
//! ```text
//! context window ─► embedding lookup ─► concat ─► dense + ReLU ─► dense ─► softmax
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Character vocabulary and encoding
//! - [`tensor`] - Minimal f64 tensor with the operations the network needs
//! - [`layers`] - Embedding, dense layer and activation/loss functions
//! - [`mlp_trainable`] - The network with forward and backward passes
//! - [`gradients`] - Gradient storage and norm
//! - [`optimizer`] - Gradient-descent update
//! - [`model`] - [`CharLM`], the user-facing model
//! - [`train`] - Dataset and full-batch training loop
//! - [`training_logger`] - CSV metrics log
//! - [`generate`] - Greedy next-character prediction and sampling
//!
//! # Example
//!
//! ```rust,no_run
//! use tinylm::{CharLM, ModelConfig};
//!
//! let text = "hello world\nhello world\n";
//! let mut model = CharLM::new(text, ModelConfig::default())?;
//!
//! let before = model.loss();
//! model.train(200, 20);
//! assert!(model.loss() < before);
//!
//! println!("{}", model.sample("hell", 40)?);
//! # Ok::<(), tinylm::ModelError>(())
//! ```

pub mod error;
pub mod generate;
pub mod gradients;
pub mod layers;
pub mod mlp_trainable;
pub mod model;
pub mod optimizer;
pub mod tensor;
pub mod tokenizer;
pub mod train;
pub mod training_logger;

// Re-export main types for convenience
pub use error::{ModelError, ModelResult};
pub use gradients::{compute_grad_norm, MLPGradients};
pub use mlp_trainable::{ForwardCache, TrainableCharMLP};
pub use model::{perplexity, CharLM, ModelConfig};
pub use tensor::Tensor;
pub use tokenizer::CharTokenizer;
pub use train::{Dataset, EpochRecord, TrainingConfig, TrainingHistory};
pub use training_logger::TrainingLogger;
