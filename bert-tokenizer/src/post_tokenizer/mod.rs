pub mod encoding;
pub mod padding;
pub mod truncation;

use std::iter::{once, repeat};

use displaydoc::Display;
use num_traits::{Num, ToPrimitive};
use thiserror::Error;

use crate::{
    model::{vocab::Vocab, Model, ModelError},
    post_tokenizer::encoding::Encoding,
    SmallString,
};

/// The number of special tokens added to a pair of sequences: one class and two separation tokens.
pub(crate) const ADDED_TOKENS: usize = 3;

/// A Bert post-tokenizer.
///
/// Combines a pair of tokenized sequences as `[CLS] first [SEP] second [SEP]`.
#[derive(Debug)]
pub struct PostTokenizer<N> {
    cls_id: N,
    pub(crate) cls_token: SmallString,
    sep_id: N,
    pub(crate) sep_token: SmallString,
    pub(crate) pad_token: SmallString,
}

/// The potential errors of the post-tokenizer.
#[derive(Debug, Display, Error)]
pub enum PostTokenizerError {
    /// Missing the class token in the vocabulary
    ClsToken,
    /// Missing the separation token in the vocabulary
    SepToken,
    /// Missing the padding token of id zero in the vocabulary
    PadToken,
    /// Missing the separation token in the tokens
    Separator,
}

impl<N> PostTokenizer<N> {
    /// Creates a validated post-tokenizer.
    pub(crate) fn new(
        cls: impl AsRef<str>,
        sep: impl AsRef<str>,
        vocab: &Vocab<N>,
    ) -> Result<Self, PostTokenizerError>
    where
        N: Num + ToPrimitive + Copy,
    {
        let cls_id = vocab
            .id(cls.as_ref())
            .ok_or(PostTokenizerError::ClsToken)?;
        let sep_id = vocab
            .id(sep.as_ref())
            .ok_or(PostTokenizerError::SepToken)?;
        let pad_token = vocab
            .token(N::zero())
            .ok_or(PostTokenizerError::PadToken)?;

        Ok(Self {
            cls_id,
            cls_token: cls.as_ref().into(),
            sep_id,
            sep_token: sep.as_ref().into(),
            pad_token: pad_token.into(),
        })
    }

    /// Assembles the pair of tokenized sequences with the special tokens.
    pub(crate) fn assemble(&self, first: Vec<String>, second: Vec<String>) -> Vec<String> {
        let cls = self.cls_token.as_str();
        let sep = self.sep_token.as_str();
        once(cls.to_string())
            .chain(first)
            .chain(once(sep.to_string()))
            .chain(second)
            .chain(once(sep.to_string()))
            .collect()
    }

    /// Computes the segment ids of the assembled tokens.
    ///
    /// Everything up to and including the first separation token belongs to the first segment,
    /// everything after it to the second segment.
    pub(crate) fn segments(&self, tokens: &[impl AsRef<str>]) -> Result<Vec<N>, PostTokenizerError>
    where
        N: Num + Copy,
    {
        let first_len = tokens
            .iter()
            .position(|token| token.as_ref() == self.sep_token.as_str())
            .ok_or(PostTokenizerError::Separator)?
            + 1;

        Ok(repeat(N::zero())
            .take(first_len)
            .chain(repeat(N::one()).take(tokens.len() - first_len))
            .collect())
    }

    /// Computes the attention mask of the assembled tokens before padding.
    pub(crate) fn mask(&self, tokens: &[impl AsRef<str>]) -> Vec<N>
    where
        N: Num + Copy,
    {
        vec![N::one(); tokens.len()]
    }

    /// Post-tokenizes the pair of tokenized sequences into an unpadded encoding.
    pub(crate) fn post_tokenize(
        &self,
        first: Vec<String>,
        second: Vec<String>,
        model: &Model<N>,
    ) -> Result<Encoding<N>, ModelError>
    where
        N: Num + Copy,
    {
        let first_len = first.len();
        let second_len = second.len();
        let len = first_len + second_len + ADDED_TOKENS;

        let ids = once(self.cls_id)
            .chain(model.ids(&first)?)
            .chain(once(self.sep_id))
            .chain(model.ids(&second)?)
            .chain(once(self.sep_id))
            .collect();
        let type_ids = repeat(N::zero())
            .take(first_len + 2)
            .chain(repeat(N::one()).take(second_len + 1))
            .collect();
        let special_tokens_mask = once(N::one())
            .chain(repeat(N::zero()).take(first_len))
            .chain(once(N::one()))
            .chain(repeat(N::zero()).take(second_len))
            .chain(once(N::one()))
            .collect();
        let attention_mask = vec![N::one(); len];
        let tokens = self.assemble(first, second);

        Ok(Encoding {
            ids,
            type_ids,
            tokens,
            special_tokens_mask,
            attention_mask,
        })
    }
}
