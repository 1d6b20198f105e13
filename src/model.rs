//! Character Language Model
//!
//! [`CharLM`] ties together the vocabulary, the training pairs and the
//! network. It is built once from a training text and then trained
//! ([`crate::train`]) and queried ([`crate::generate`]).
//!
//! ## Configuration
//!
//! [`ModelConfig`] fixes every shape at construction time:
//!
//! | Parameter | Shape |
//! |---|---|
//! | E  | `[vocab_size, embed_dim]` |
//! | W1 | `[hidden_dim, context * embed_dim]` |
//! | b1 | `[hidden_dim]` |
//! | W2 | `[vocab_size, hidden_dim]` |
//! | b2 | `[vocab_size]` |
//!
//! ## Reproducibility
//!
//! Each model owns its own generator, seeded from [`ModelConfig::seed`].
//! Two models built from the same text, configuration and seed hold
//! bit-identical parameters, no matter what else runs in the process.
//!
//! ## Example
//!
//! ```rust
//! use tinylm::{CharLM, ModelConfig};
//!
//! let config = ModelConfig { context: 2, embed_dim: 3, hidden_dim: 6, ..ModelConfig::default() };
//! let model = CharLM::new("abcabcabc", config)?;
//! assert_eq!(model.tokenizer().vocab_size(), 3);
//! assert_eq!(model.dataset().len(), 7);
//! # Ok::<(), tinylm::ModelError>(())
//! ```

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::layers::cross_entropy_loss;
use crate::mlp_trainable::TrainableCharMLP;
use crate::tokenizer::CharTokenizer;
use crate::train::Dataset;

/// Half-width of the uniform interval embedding weights are drawn from
pub const EMBEDDING_INIT_SCALE: f64 = 0.5;

/// Half-width of the uniform interval dense-layer weights are drawn from
pub const DENSE_INIT_SCALE: f64 = 0.1;

/// Model hyperparameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of preceding characters used to predict the next one
    pub context: usize,
    /// Width of each character embedding
    pub embed_dim: usize,
    /// Width of the hidden layer
    pub hidden_dim: usize,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// Seed for parameter initialization; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            context: 4,
            embed_dim: 8,
            hidden_dim: 32,
            learning_rate: 0.1,
            seed: Some(42),
        }
    }
}

impl ModelConfig {
    /// Create a configuration from its five hyperparameters
    pub fn new(
        context: usize,
        embed_dim: usize,
        hidden_dim: usize,
        learning_rate: f64,
        seed: Option<u64>,
    ) -> Self {
        Self {
            context,
            embed_dim,
            hidden_dim,
            learning_rate,
            seed,
        }
    }

    /// Width of the flattened network input (`context * embed_dim`)
    pub fn input_dim(&self) -> usize {
        self.context * self.embed_dim
    }

    /// Check that every dimension is positive and the learning rate is a
    /// positive finite number
    pub fn validate(&self) -> ModelResult<()> {
        for (name, value) in [
            ("context", self.context),
            ("embed_dim", self.embed_dim),
            ("hidden_dim", self.hidden_dim),
        ] {
            if value == 0 {
                return Err(ModelError::InvalidConfiguration(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ModelError::InvalidConfiguration(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let config: ModelConfig = serde_json::from_str(json)
            .map_err(|e| ModelError::InvalidConfiguration(format!("config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json(&self) -> ModelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ModelError::InvalidConfiguration(format!("config json: {e}")))
    }
}

/// A character-level language model and the data it trains on
#[derive(Clone, Debug)]
pub struct CharLM {
    pub(crate) config: ModelConfig,
    pub(crate) tokenizer: CharTokenizer,
    pub(crate) dataset: Dataset,
    pub(crate) network: TrainableCharMLP,
}

impl CharLM {
    /// Build the vocabulary, the training pairs and freshly initialized
    /// parameters from `text`
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidConfiguration`] if the configuration is invalid or
    /// `text` has no more characters than the context window.
    pub fn new(text: &str, config: ModelConfig) -> ModelResult<Self> {
        config.validate()?;

        let tokenizer = CharTokenizer::from_text(text);
        let dataset = Dataset::from_text(text, &tokenizer, config.context)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let network = TrainableCharMLP::new(tokenizer.vocab_size(), &config, &mut rng)?;

        debug!(
            "Built model: vocab={} pairs={} parameters={}",
            tokenizer.vocab_size(),
            dataset.len(),
            network.num_parameters()
        );

        Ok(Self {
            config,
            tokenizer,
            dataset,
            network,
        })
    }

    /// Hyperparameters the model was built with
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Context window width
    pub fn context(&self) -> usize {
        self.config.context
    }

    /// Character vocabulary
    pub fn tokenizer(&self) -> &CharTokenizer {
        &self.tokenizer
    }

    /// Training pairs
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Network parameters
    pub fn network(&self) -> &TrainableCharMLP {
        &self.network
    }

    /// Mean cross-entropy over the training pairs with the current parameters
    pub fn loss(&self) -> f64 {
        mean_loss(&self.network, &self.dataset)
    }

    /// Mean cross-entropy over the windows of another text
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidConfiguration`] if `text` is not longer than
    ///   the context, so it holds no window to score
    /// - [`ModelError::UnknownSymbol`] if `text` holds a character outside
    ///   the vocabulary
    pub fn evaluate(&self, text: &str) -> ModelResult<f64> {
        let dataset = Dataset::from_text(text, &self.tokenizer, self.config.context)?;
        Ok(mean_loss(&self.network, &dataset))
    }
}

fn mean_loss(network: &TrainableCharMLP, dataset: &Dataset) -> f64 {
    let total: f64 = dataset
        .iter()
        .map(|(x, target)| {
            let (probs, _) = network.forward(x);
            cross_entropy_loss(&probs, target)
        })
        .sum();
    total / dataset.len() as f64
}

/// Perplexity of a mean cross-entropy: `exp(loss)`
pub fn perplexity(loss: f64) -> f64 {
    loss.exp()
}
