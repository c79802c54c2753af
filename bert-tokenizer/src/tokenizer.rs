use displaydoc::Display;
use num_traits::{Num, ToPrimitive};
use thiserror::Error;

#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    model::{vocab::Vocab, Model, ModelError},
    normalizer::Normalizer,
    post_tokenizer::{
        encoding::Encoding,
        padding::{Padding, PaddingError},
        truncation::{Truncation, TruncationError},
        PostTokenizer,
        PostTokenizerError,
    },
    pre_tokenizer::PreTokenizer,
};

/// A Bert tokenizer.
///
/// Can be created via the [`Builder`] and consists of a Bert normalizer, a Bert pre-tokenizer, a
/// Bert word piece model and a Bert post-tokenizer including truncation and padding.
///
/// [`Builder`]: crate::Builder
#[derive(Debug)]
pub struct Tokenizer<N> {
    pub(crate) normalizer: Normalizer,
    pub(crate) pre_tokenizer: PreTokenizer,
    pub(crate) model: Model<N>,
    pub(crate) post_tokenizer: PostTokenizer<N>,
}

/// The potential errors of the tokenizer.
#[derive(Debug, Display, Error)]
pub enum TokenizerError {
    /// Failed to convert between tokens and ids: {0}
    Model(#[from] ModelError),
    /// Failed to post-tokenize the sequences: {0}
    PostTokenizer(#[from] PostTokenizerError),
    /// Failed to truncate the sequences: {0}
    Truncation(#[from] TruncationError),
    /// Failed to pad the sequences: {0}
    Padding(#[from] PaddingError),
}

impl<N> Tokenizer<N> {
    /// Gets the vocabulary.
    pub fn vocab(&self) -> &Vocab<N> {
        self.model.vocab.as_ref()
    }

    /// Normalizes and splits the sequence into coarse tokens.
    ///
    /// The coarse tokens are whitespace separated words and single punctuation characters or CJK
    /// ideographs.
    pub fn normalize(&self, sequence: impl AsRef<str>) -> Vec<String> {
        let sequence = self.normalizer.normalize(sequence.as_ref());
        self.pre_tokenizer.pre_tokenize(&sequence, &self.normalizer)
    }

    /// Segments a coarse token into word pieces.
    ///
    /// Space separated words within the token are segmented independently.
    pub fn segment(&self, word: impl AsRef<str>) -> Vec<String> {
        self.model.tokenize(word.as_ref())
    }

    /// Tokenizes the sequence into word pieces.
    pub fn tokenize(&self, sequence: impl AsRef<str>) -> Vec<String> {
        self.normalize(sequence)
            .iter()
            .flat_map(|word| self.segment(word))
            .collect()
    }

    /// Converts the tokens to their ids.
    ///
    /// # Errors
    /// Fails if a token is not in the vocabulary.
    pub fn to_ids(&self, tokens: &[impl AsRef<str>]) -> Result<Vec<N>, ModelError>
    where
        N: Copy,
    {
        self.model.ids(tokens)
    }

    /// Converts the ids to their tokens.
    ///
    /// # Errors
    /// Fails if an id is not in the vocabulary.
    pub fn to_tokens(&self, ids: &[N]) -> Result<Vec<String>, ModelError>
    where
        N: ToPrimitive + Copy,
    {
        self.model.tokens(ids)
    }

    /// Tokenizes the pair of sequences and assembles them with the special tokens.
    ///
    /// The sequences are truncated such that the assembled tokens are at most `len` long. The
    /// result is not padded.
    ///
    /// # Errors
    /// Fails if `len` is less than three.
    pub fn tokenize_pair(
        &self,
        first: impl AsRef<str>,
        second: impl AsRef<str>,
        len: usize,
    ) -> Result<Vec<String>, TruncationError> {
        let (first, second) =
            Truncation::fixed(len)?.truncate(self.tokenize(first), self.tokenize(second));
        Ok(self.post_tokenizer.assemble(first, second))
    }

    /// Computes the segment ids of assembled tokens.
    ///
    /// # Errors
    /// Fails if the tokens don't contain a separation token.
    pub fn segments(&self, tokens: &[impl AsRef<str>]) -> Result<Vec<N>, PostTokenizerError>
    where
        N: Num + Copy,
    {
        self.post_tokenizer.segments(tokens)
    }

    /// Computes the attention mask of assembled tokens.
    pub fn mask(&self, tokens: &[impl AsRef<str>]) -> Vec<N>
    where
        N: Num + Copy,
    {
        self.post_tokenizer.mask(tokens)
    }

    /// Pads the ids, segment ids and attention mask with zeros to the length `len`.
    ///
    /// # Errors
    /// Fails if any of them is longer than `len`.
    #[allow(clippy::type_complexity)]
    pub fn pad(
        &self,
        ids: Vec<N>,
        segments: Vec<N>,
        mask: Vec<N>,
        len: usize,
    ) -> Result<(Vec<N>, Vec<N>, Vec<N>), PaddingError>
    where
        N: Num + Copy,
    {
        let padding = Padding::fixed(len);
        Ok((
            padding.pad(ids, N::zero())?,
            padding.pad(segments, N::zero())?,
            padding.pad(mask, N::zero())?,
        ))
    }

    /// Encodes the pair of sequences.
    ///
    /// The encoding is truncated and padded to exactly `len` tokens.
    ///
    /// # Errors
    /// Fails if `len` is less than three.
    pub fn encode_pair(
        &self,
        first: impl AsRef<str>,
        second: impl AsRef<str>,
        len: usize,
    ) -> Result<Encoding<N>, TokenizerError>
    where
        N: Num + Copy,
    {
        let (first, second) =
            Truncation::fixed(len)?.truncate(self.tokenize(first), self.tokenize(second));
        let encoding = self
            .post_tokenizer
            .post_tokenize(first, second, &self.model)?;
        encoding
            .pad(
                &Padding::fixed(len),
                N::zero(),
                self.post_tokenizer.pad_token.as_str(),
            )
            .map_err(Into::into)
    }

    /// Encodes the sequence as the first of a pair with an empty second sequence.
    ///
    /// # Errors
    /// Fails if `len` is less than three.
    pub fn encode(&self, sequence: impl AsRef<str>, len: usize) -> Result<Encoding<N>, TokenizerError>
    where
        N: Num + Copy,
    {
        self.encode_pair(sequence, "", len)
    }

    /// Encodes the batch of sequence pairs.
    ///
    /// The pairs are encoded in parallel if the `multithreaded` feature is enabled.
    ///
    /// # Errors
    /// Fails if `len` is less than three.
    pub fn encode_batch<F, S>(
        &self,
        pairs: &[(F, S)],
        len: usize,
    ) -> Result<Vec<Encoding<N>>, TokenizerError>
    where
        N: Num + Copy + Send + Sync,
        F: AsRef<str> + Sync,
        S: AsRef<str> + Sync,
    {
        #[cfg(not(feature = "multithreaded"))]
        let pairs = pairs.iter();
        #[cfg(feature = "multithreaded")]
        let pairs = pairs.into_par_iter();

        pairs
            .map(|(first, second)| self.encode_pair(first, second, len))
            .collect()
    }

    /// Joins the tokens to a sequence.
    ///
    /// Continuing subwords are glued to their predecessors. The cleanup additionally removes the
    /// special and unknown tokens and some whitespace artifacts of the tokenization.
    pub fn detokenize(&self, tokens: &[impl AsRef<str>], cleanup: bool) -> String {
        let removed = [
            self.model.unk_token.as_str(),
            self.post_tokenizer.cls_token.as_str(),
            self.post_tokenizer.sep_token.as_str(),
            self.post_tokenizer.pad_token.as_str(),
        ];
        let tokens = tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|token| !cleanup || !removed.contains(token))
            .collect::<Vec<_>>();
        let mut sequence = tokens
            .join(" ")
            .replace(format!(" {}", self.model.prefix.as_str()).as_str(), "");
        if cleanup {
            sequence = sequence
                .replace(" .", ".")
                .replace(" ?", "?")
                .replace(" !", "!")
                .replace(" ,", ",")
                .replace(" ' ", "'")
                .replace(" n't", "n't")
                .replace(" 'm", "'m")
                .replace(" do not", " don't")
                .replace(" 's", "'s")
                .replace(" 've", "'ve")
                .replace(" 're", "'re");
        }

        sequence
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::Builder;

    const VOCAB: &str = "[PAD]\n[UNK]\n[CLS]\n[SEP]\nthe\ncat\nsat\non\nmat\n.\n,\nun\n##aff\n##able\n!\n";

    fn tokenizer() -> Tokenizer<u32> {
        Builder::new(Cursor::new(VOCAB)).unwrap().build().unwrap()
    }

    #[test]
    fn test_tokenize() {
        let tokenizer = tokenizer();
        assert_eq!(
            tokenizer.tokenize("The cat sat on the mat."),
            ["the", "cat", "sat", "on", "the", "mat", "."],
        );
        assert_eq!(
            tokenizer.tokenize("Unaffable dog!"),
            ["un", "##aff", "##able", "[UNK]", "!"],
        );
        assert!(tokenizer.tokenize("").is_empty());
    }

    #[test]
    fn test_segment() {
        let tokenizer = tokenizer();
        assert_eq!(tokenizer.segment("unaffable"), ["un", "##aff", "##able"]);
        assert_eq!(tokenizer.segment("unaff cat"), ["un", "##aff", "cat"]);
        assert!(tokenizer.segment("").is_empty());
    }

    #[test]
    fn test_ids_round_trip() {
        let tokenizer = tokenizer();
        let tokens = tokenizer.tokenize("The unaffable cat, the mat!");
        let ids = tokenizer.to_ids(&tokens).unwrap();
        assert_eq!(ids, [4, 11, 12, 13, 5, 10, 4, 8, 14]);
        assert_eq!(tokenizer.to_tokens(&ids).unwrap(), tokens);
    }

    #[test]
    fn test_tokenize_pair() {
        let tokenizer = tokenizer();
        assert_eq!(
            tokenizer
                .tokenize_pair("The cat sat.", "On the mat.", 128)
                .unwrap(),
            ["[CLS]", "the", "cat", "sat", ".", "[SEP]", "on", "the", "mat", ".", "[SEP]"],
        );
        assert_eq!(
            tokenizer
                .tokenize_pair("The cat sat.", "On the mat.", 7)
                .unwrap(),
            ["[CLS]", "the", "cat", "[SEP]", "on", "the", "[SEP]"],
        );
        assert_eq!(
            tokenizer.tokenize_pair("The cat sat.", "", 3).unwrap(),
            ["[CLS]", "[SEP]", "[SEP]"],
        );
        assert!(matches!(
            tokenizer.tokenize_pair("The cat sat.", "", 2),
            Err(TruncationError::SeqLen { len: 2 }),
        ));
    }

    #[test]
    fn test_pad() {
        let tokenizer = tokenizer();
        let (ids, segments, mask) = tokenizer
            .pad(vec![2, 5, 3, 3], vec![0, 0, 0, 1], vec![1, 1, 1, 1], 6)
            .unwrap();
        assert_eq!(ids, [2, 5, 3, 3, 0, 0]);
        assert_eq!(segments, [0, 0, 0, 1, 0, 0]);
        assert_eq!(mask, [1, 1, 1, 1, 0, 0]);
        assert!(matches!(
            tokenizer.pad(vec![2, 5, 3, 3], vec![0, 0, 0, 1], vec![1, 1, 1, 1], 3),
            Err(PaddingError::Overflow { len: 4, max: 3 }),
        ));
    }

    #[test]
    fn test_encode() {
        let encoding = tokenizer().encode("The cat!", 6).unwrap();
        assert_eq!(encoding.ids(), [2, 4, 5, 14, 3, 3]);
        assert_eq!(encoding.type_ids(), [0, 0, 0, 0, 0, 1]);
        assert_eq!(encoding.attention_mask(), [1, 1, 1, 1, 1, 1]);

        let encoding = tokenizer().encode("The cat!", 8).unwrap();
        assert_eq!(encoding.ids(), [2, 4, 5, 14, 3, 3, 0, 0]);
        assert_eq!(encoding.type_ids(), [0, 0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(encoding.attention_mask(), [1, 1, 1, 1, 1, 1, 0, 0]);
        assert_eq!(encoding.special_tokens_mask(), [1, 0, 0, 0, 1, 1, 1, 1]);
        assert_eq!(encoding.tokens()[6..], ["[PAD]", "[PAD]"]);
    }

    #[test]
    fn test_encode_truncated() {
        let encoding = tokenizer().encode("The cat sat on the mat.", 5).unwrap();
        assert_eq!(encoding.tokens(), ["[CLS]", "the", "cat", "[SEP]", "[SEP]"]);
        assert_eq!(encoding.ids(), [2, 4, 5, 3, 3]);
        assert_eq!(encoding.type_ids(), [0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_seq_len() {
        assert!(matches!(
            tokenizer().encode("The cat.", 2),
            Err(TokenizerError::Truncation(TruncationError::SeqLen { len: 2 })),
        ));
    }

    #[test]
    fn test_encode_batch() {
        let tokenizer = tokenizer();
        let encodings = tokenizer
            .encode_batch(&[("The cat.", "The mat."), ("Un", "")], 9)
            .unwrap();
        assert_eq!(encodings.len(), 2);
        assert_eq!(encodings[0].ids(), [2, 4, 5, 9, 3, 4, 8, 9, 3]);
        assert_eq!(encodings[0].type_ids(), [0, 0, 0, 0, 0, 1, 1, 1, 1]);
        assert_eq!(encodings[1].ids(), [2, 11, 3, 3, 0, 0, 0, 0, 0]);
        assert_eq!(
            encodings[1],
            tokenizer.encode_pair("Un", "", 9).unwrap(),
        );
    }

    #[test]
    fn test_detokenize() {
        let tokenizer = tokenizer();
        let tokens = tokenizer.tokenize_pair("The unaffable cat, sat!", "", 16).unwrap();
        assert_eq!(
            tokenizer.detokenize(&tokens, false),
            "[CLS] the unaffable cat , sat ! [SEP] [SEP]",
        );
        assert_eq!(
            tokenizer.detokenize(&tokens, true),
            "the unaffable cat, sat!",
        );
    }
}
