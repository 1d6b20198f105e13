//! Text Generation
//!
//! Greedy, autoregressive decoding: the most probable next character is
//! appended and the window slides forward by one.
//!
//! ```text
//! seed "hel", context 3
//!   window "hel" → 'l'   text "hell"
//!   window "ell" → 'o'   text "hello"
//!   window "llo" → '\n'  text "hello\n"  (stop)
//! ```
//!
//! Ties go to the lowest vocabulary index. There is no randomness at
//! sampling time, so a trained model always produces the same text for the
//! same seed.

use crate::error::{ModelError, ModelResult};
use crate::model::CharLM;

/// Character that ends generation early
pub const STOP_CHAR: char = '\n';

/// Preferred character for left-padding seeds shorter than the context window
pub const PAD_CHAR: char = ' ';

impl CharLM {
    /// Predict the character that follows `context_text`
    ///
    /// # Returns
    ///
    /// The most probable next character and the full probability vector, in
    /// vocabulary order
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidInput`] if `context_text` is not exactly
    ///   `context` characters long
    /// - [`ModelError::UnknownSymbol`] if it holds a character outside the
    ///   vocabulary
    pub fn predict_next(&self, context_text: &str) -> ModelResult<(char, Vec<f64>)> {
        let actual = context_text.chars().count();
        if actual != self.config.context {
            return Err(ModelError::InvalidInput {
                expected: self.config.context,
                actual,
            });
        }

        let ids = self.tokenizer.encode(context_text)?;
        let (probs, _) = self.network.forward(&ids);
        let next = probs.argmax().unwrap_or(0);
        Ok((self.tokenizer.symbols()[next], probs.data))
    }

    /// Extend `seed` by up to `max_new` greedily chosen characters
    ///
    /// Seeds shorter than the context are left-padded (see
    /// [`pad_symbol`](Self::pad_symbol)); only the last `context` characters
    /// of longer seeds are kept. The result is that initial window followed
    /// by the generated characters. Generation stops early right after a
    /// newline is produced.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownSymbol`] if the kept part of `seed` holds a
    /// character outside the vocabulary. Padding never fails.
    pub fn sample(&self, seed: &str, max_new: usize) -> ModelResult<String> {
        let context = self.config.context;

        let seed_chars: Vec<char> = seed.chars().collect();
        let pad = self.pad_symbol();
        let mut window: Vec<char> = vec![pad; context.saturating_sub(seed_chars.len())];
        window.extend_from_slice(&seed_chars[seed_chars.len().saturating_sub(context)..]);

        let mut ids = Vec::with_capacity(context + max_new);
        for &ch in &window {
            ids.push(
                self.tokenizer
                    .char_to_id(ch)
                    .ok_or(ModelError::UnknownSymbol(ch))?,
            );
        }

        let mut generated: String = window.into_iter().collect();
        for _ in 0..max_new {
            let next = self.greedy_step(&ids[ids.len() - context..]);
            let ch = self.tokenizer.symbols()[next];
            ids.push(next);
            generated.push(ch);
            if ch == STOP_CHAR {
                break;
            }
        }
        Ok(generated)
    }

    /// Character used to pad short seeds
    ///
    /// [`PAD_CHAR`] when the training text contained it, otherwise the first
    /// vocabulary symbol.
    pub fn pad_symbol(&self) -> char {
        match self.tokenizer.char_to_id(PAD_CHAR) {
            Some(_) => PAD_CHAR,
            None => self.tokenizer.symbols()[0],
        }
    }

    fn greedy_step(&self, window: &[usize]) -> usize {
        let (probs, _) = self.network.forward(window);
        // A built model has at least one vocabulary entry
        probs.argmax().unwrap_or(0)
    }
}
