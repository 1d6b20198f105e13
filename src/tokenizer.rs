//! Character-Level Tokenization
//!
//! The vocabulary is the set of distinct characters in the training text,
//! sorted by code point. Sorting makes index assignment a pure function of
//! the character set: the same text always yields the same indices.
//!
//! ## Example
//!
//! ```rust
//! use tinylm::CharTokenizer;
//!
//! let tokenizer = CharTokenizer::from_text("hello");
//! assert_eq!(tokenizer.symbols(), &['e', 'h', 'l', 'o']);
//!
//! let ids = tokenizer.encode("hole").unwrap();
//! assert_eq!(ids, vec![1, 3, 2, 0]);
//! assert_eq!(tokenizer.decode(&ids).unwrap(), "hole");
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::error::{ModelError, ModelResult};

/// Bidirectional character <-> index mapping
///
/// Indices are dense and 0-based. The mapping never changes after
/// construction.
#[derive(Clone, Debug)]
pub struct CharTokenizer {
    id_to_char: Vec<char>,
    char_to_id: HashMap<char, usize>,
}

impl CharTokenizer {
    /// Build the vocabulary from every distinct character of `text`
    pub fn from_text(text: &str) -> Self {
        let id_to_char: Vec<char> = text.chars().collect::<BTreeSet<_>>().into_iter().collect();
        let char_to_id = id_to_char
            .iter()
            .enumerate()
            .map(|(id, &ch)| (ch, id))
            .collect();

        Self {
            id_to_char,
            char_to_id,
        }
    }

    /// Number of distinct characters
    pub fn vocab_size(&self) -> usize {
        self.id_to_char.len()
    }

    /// Vocabulary in index order
    pub fn symbols(&self) -> &[char] {
        &self.id_to_char
    }

    /// Index of `ch`, if it is in the vocabulary
    pub fn char_to_id(&self, ch: char) -> Option<usize> {
        self.char_to_id.get(&ch).copied()
    }

    /// Character at index `id`, if in range
    pub fn id_to_char(&self, id: usize) -> Option<char> {
        self.id_to_char.get(id).copied()
    }

    /// Encode a string into vocabulary indices
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownSymbol`] for the first character that is not in
    /// the vocabulary.
    pub fn encode(&self, text: &str) -> ModelResult<Vec<usize>> {
        text.chars()
            .map(|ch| self.char_to_id(ch).ok_or(ModelError::UnknownSymbol(ch)))
            .collect()
    }

    /// Decode vocabulary indices back into a string
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidIndex`] for the first index outside the vocabulary.
    pub fn decode(&self, ids: &[usize]) -> ModelResult<String> {
        ids.iter()
            .map(|&id| self.id_to_char(id).ok_or(ModelError::InvalidIndex(id)))
            .collect()
    }
}
