//! Training Data and the Training Loop
//!
//! ## How Training Pairs Are Generated
//!
//! A window of `context` characters slides over the text one position at a
//! time; the character right after the window is the target:
//!
//! ```text
//! Text:    h e l l o
//! Context: 2
//!
//!   Input: [h, e]  Target: l
//!   Input: [e, l]  Target: l
//!   Input: [l, l]  Target: o
//! ```
//!
//! A text of `L` characters yields exactly `L - context` pairs.
//!
//! ## Full-Batch Gradient Descent
//!
//! Every epoch visits every pair once:
//!
//! ```text
//! for (x, t) in dataset:
//!     probs, cache = forward(x)
//!     loss_total  += -ln(probs[t] + ε)
//!     grad_total  += backward(cache, t)
//! θ -= lr * grad_total / num_pairs
//! ```
//!
//! There is no shuffling, batching or early stopping; training runs for
//! exactly the requested number of epochs.
//!
//! ## Example
//!
//! ```rust
//! use tinylm::{CharLM, ModelConfig};
//!
//! let config = ModelConfig { context: 2, embed_dim: 3, hidden_dim: 8, learning_rate: 0.5, seed: Some(1) };
//! let mut model = CharLM::new("abcabcabcabcabc", config)?;
//!
//! let before = model.loss();
//! let history = model.train(50, 10);
//! assert_eq!(history.records.len(), 5);
//! assert!(model.loss() < before);
//! # Ok::<(), tinylm::ModelError>(())
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::gradients::{compute_grad_norm, MLPGradients};
use crate::layers::cross_entropy_loss;
use crate::model::CharLM;
use crate::optimizer::sgd_update;
use crate::tokenizer::CharTokenizer;
use crate::training_logger::TrainingLogger;

/// Ordered (context, target) training pairs
///
/// `inputs[i]` and `targets[i]` form pair `i`, the window starting at
/// character `i` of the text.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub inputs: Vec<Vec<usize>>,
    pub targets: Vec<usize>,
}

impl Dataset {
    /// Slide a `context`-wide window over `text`
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidConfiguration`] if `text` has `context` or
    ///   fewer characters, so no window can be formed
    /// - [`ModelError::UnknownSymbol`] if `text` holds a character outside
    ///   the tokenizer's vocabulary
    pub fn from_text(text: &str, tokenizer: &CharTokenizer, context: usize) -> ModelResult<Self> {
        let ids = tokenizer.encode(text)?;
        if ids.len() <= context {
            return Err(ModelError::InvalidConfiguration(format!(
                "text has {} characters, needs more than the context window of {}",
                ids.len(),
                context
            )));
        }

        let inputs = ids.windows(context).map(<[usize]>::to_vec);
        let targets = ids[context..].iter().copied();
        let (inputs, targets) = inputs.zip(targets).unzip();

        Ok(Self { inputs, targets })
    }

    /// Number of training pairs
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True if there are no pairs (never the case for a built dataset)
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate over `(context, target)` pairs in text order
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], usize)> + '_ {
        self.inputs
            .iter()
            .map(Vec::as_slice)
            .zip(self.targets.iter().copied())
    }
}

/// Training loop settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of full passes over the dataset
    pub epochs: usize,
    /// Report progress every N epochs (0 disables reporting)
    pub report_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 200,
            report_every: 20,
        }
    }
}

/// Statistics of one epoch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number
    pub epoch: usize,
    /// Mean loss over the epoch's pass, before its update
    pub loss: f64,
    /// L2 norm of the averaged gradient that was applied
    pub grad_norm: f64,
}

/// Progress reported during a training run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// One record per reported epoch, in order
    pub records: Vec<EpochRecord>,
}

impl TrainingHistory {
    /// Most recent reported record
    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }
}

impl CharLM {
    /// Train with full-batch gradient descent
    ///
    /// Runs exactly `epochs` epochs. Every `report_every` epochs the mean loss
    /// is logged at info level as `Epoch NNN | loss=X.XXXX` and recorded in
    /// the returned history.
    pub fn train(&mut self, epochs: usize, report_every: usize) -> TrainingHistory {
        let mut history = TrainingHistory::default();
        for epoch in 1..=epochs {
            let record = self.run_epoch(epoch);
            if is_report_epoch(epoch, report_every) {
                report(&record);
                history.records.push(record);
            }
        }
        history
    }

    /// Train like [`train`](Self::train), also appending every reported
    /// epoch to a CSV training log
    ///
    /// # Errors
    ///
    /// [`ModelError::Io`] if the log cannot be written. Parameters keep every
    /// update applied before the failure.
    pub fn train_with_logger(
        &mut self,
        config: &TrainingConfig,
        logger: &mut TrainingLogger,
    ) -> ModelResult<TrainingHistory> {
        let mut history = TrainingHistory::default();
        for epoch in 1..=config.epochs {
            let record = self.run_epoch(epoch);
            if is_report_epoch(epoch, config.report_every) {
                report(&record);
                logger.log(&record, self.config.learning_rate)?;
                history.records.push(record);
            }
        }
        Ok(history)
    }

    /// One full pass over the dataset followed by one parameter update
    fn run_epoch(&mut self, epoch: usize) -> EpochRecord {
        let network = &mut self.network;
        let num_pairs = self.dataset.len();

        let mut total_loss = 0.0;
        let mut grads = MLPGradients::zeros_like(network);

        for (x, target) in self.dataset.iter() {
            let (probs, cache) = network.forward(x);
            total_loss += cross_entropy_loss(&probs, target);
            grads.accumulate(&network.backward(&cache, target));
        }

        // Mean gradient keeps the step size independent of dataset size
        grads.scale(1.0 / num_pairs as f64);
        let grad_norm = compute_grad_norm(&grads);

        sgd_update(network, &grads, self.config.learning_rate);

        EpochRecord {
            epoch,
            loss: total_loss / num_pairs as f64,
            grad_norm,
        }
    }
}

fn is_report_epoch(epoch: usize, report_every: usize) -> bool {
    report_every != 0 && epoch % report_every == 0
}

fn report(record: &EpochRecord) {
    info!("Epoch {:03} | loss={:.4}", record.epoch, record.loss);
    debug!("Epoch {:03} | grad_norm={:.6}", record.epoch, record.grad_norm);
}
