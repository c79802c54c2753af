use std::iter;

use num_traits::Num;

use crate::post_tokenizer::padding::{Padding, PaddingError};

/// An encoded sequence pair.
///
/// All the parts have the same length, one entry per token including the special and padding
/// tokens.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Encoding<N> {
    /// The IDs of the tokens.
    pub(crate) ids: Vec<N>,
    /// The segment of the tokens, `0` for the first and `1` for the second sequence.
    pub(crate) type_ids: Vec<N>,
    /// The tokenized sequences.
    pub(crate) tokens: Vec<String>,
    /// The mask identifying special tokens.
    pub(crate) special_tokens_mask: Vec<N>,
    /// The mask identifying padding tokens.
    pub(crate) attention_mask: Vec<N>,
}

impl<N> Encoding<N> {
    /// Gets the total length.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks whether this is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Gets the ids.
    pub fn ids(&self) -> &[N] {
        self.ids.as_slice()
    }

    /// Gets the type ids.
    pub fn type_ids(&self) -> &[N] {
        self.type_ids.as_slice()
    }

    /// Gets the tokens.
    pub fn tokens(&self) -> &[String] {
        self.tokens.as_slice()
    }

    /// Gets the special tokens mask.
    pub fn special_tokens_mask(&self) -> &[N] {
        self.special_tokens_mask.as_slice()
    }

    /// Gets the attention mask.
    pub fn attention_mask(&self) -> &[N] {
        self.attention_mask.as_slice()
    }

    /// Pads to the fixed length.
    pub(crate) fn pad(
        mut self,
        padding: &Padding,
        pad_id: N,
        pad_token: &str,
    ) -> Result<Self, PaddingError>
    where
        N: Num + Copy,
    {
        let pad_len = padding.check(self.len())?;

        self.ids.extend(iter::repeat(pad_id).take(pad_len));
        self.type_ids.extend(iter::repeat(N::zero()).take(pad_len));
        self.tokens
            .extend(iter::repeat(pad_token.to_string()).take(pad_len));
        self.special_tokens_mask
            .extend(iter::repeat(N::one()).take(pad_len));
        self.attention_mask
            .extend(iter::repeat(N::zero()).take(pad_len));
        debug_assert_eq!(self.len(), padding.len());

        Ok(self)
    }
}
