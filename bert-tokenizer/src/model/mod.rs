pub mod vocab;

use std::sync::Arc;

use displaydoc::Display;
use log::trace;
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::{model::vocab::Vocab, pre_tokenizer::PreTokenizer, SmallString};

/// A Bert word piece model.
#[derive(Debug)]
pub struct Model<N> {
    pub(crate) vocab: Arc<Vocab<N>>,
    pub(crate) unk_token: SmallString,
    pub(crate) prefix: SmallString,
    pub(crate) max_chars: usize,
}

/// The potential errors of the word piece model.
#[derive(Debug, Display, Error)]
pub enum ModelError {
    /// Missing the unknown token in the vocabulary
    UnkToken,
    /// The continuing subword prefix must not be empty
    Prefix,
    /// The token {0:?} is not in the vocabulary
    UnknownToken(String),
    /// The id {0} is not in the vocabulary
    UnknownId(usize),
    /// The id is not a valid vocabulary index
    InvalidId,
}

impl<N> Model<N> {
    /// Creates a validated word piece model.
    pub(crate) fn new(
        vocab: Arc<Vocab<N>>,
        unk: impl AsRef<str>,
        prefix: impl AsRef<str>,
        max_chars: usize,
    ) -> Result<Self, ModelError> {
        if !vocab.contains(unk.as_ref()) {
            return Err(ModelError::UnkToken);
        }
        if prefix.as_ref().is_empty() {
            return Err(ModelError::Prefix);
        }

        Ok(Self {
            vocab,
            unk_token: unk.as_ref().into(),
            prefix: prefix.as_ref().into(),
            max_chars,
        })
    }

    /// Finds the longest vocabulary piece of the word starting at the byte index `start`.
    ///
    /// Returns the piece and the byte index right after the matched characters.
    fn longest_piece(&self, word: &str, start: usize) -> Option<(String, usize)> {
        let mut ends = word[start..]
            .char_indices()
            .map(|(idx, c)| start + idx + c.len_utf8())
            .collect::<Vec<_>>();
        ends.reverse();

        ends.into_iter().find_map(|end| {
            let piece = if start > 0 {
                format!("{}{}", self.prefix.as_str(), &word[start..end])
            } else {
                word[start..end].to_string()
            };
            if self.vocab.contains(&piece) {
                Some((piece, end))
            } else {
                None
            }
        })
    }

    /// Splits a single word into word pieces by greedy longest-match-first search.
    ///
    /// Words which are too long or can't be fully covered by vocabulary pieces are replaced by the
    /// unknown token as a whole.
    fn tokenize_word(&self, word: &str) -> Vec<String> {
        if word.chars().count() > self.max_chars {
            trace!("word exceeds {} characters: {:?}", self.max_chars, word);
            return vec![self.unk_token.as_str().to_string()];
        }

        let mut pieces = Vec::new();
        let mut start = 0;
        while start < word.len() {
            if let Some((piece, end)) = self.longest_piece(word, start) {
                pieces.push(piece);
                start = end;
            } else {
                trace!("word can't be covered by word pieces: {:?}", word);
                return vec![self.unk_token.as_str().to_string()];
            }
        }

        pieces
    }

    /// Tokenizes the space separated words of the sequence into word pieces.
    pub(crate) fn tokenize(&self, sequence: &str) -> Vec<String> {
        PreTokenizer::split_whitespace(sequence)
            .flat_map(|word| self.tokenize_word(word))
            .collect()
    }

    /// Converts the tokens to their ids.
    pub(crate) fn ids(&self, tokens: &[impl AsRef<str>]) -> Result<Vec<N>, ModelError>
    where
        N: Copy,
    {
        tokens
            .iter()
            .map(|token| {
                self.vocab
                    .id(token.as_ref())
                    .ok_or_else(|| ModelError::UnknownToken(token.as_ref().to_string()))
            })
            .collect()
    }

    /// Converts the ids to their tokens.
    pub(crate) fn tokens(&self, ids: &[N]) -> Result<Vec<String>, ModelError>
    where
        N: ToPrimitive + Copy,
    {
        ids.iter()
            .map(|&id| {
                let idx = id.to_usize().ok_or(ModelError::InvalidId)?;
                self.vocab
                    .token(id)
                    .map(ToString::to_string)
                    .ok_or(ModelError::UnknownId(idx))
            })
            .collect()
    }
}
