use std::{
    fs::File,
    io::{BufRead, BufReader, Error as IoError},
    path::Path,
    sync::Arc,
};

use displaydoc::Display;
use log::debug;
use num_traits::{FromPrimitive, Num, ToPrimitive};
use thiserror::Error;

use crate::{
    model::{
        vocab::{Vocab, VocabError},
        Model,
        ModelError,
    },
    normalizer::Normalizer,
    post_tokenizer::{PostTokenizer, PostTokenizerError},
    pre_tokenizer::PreTokenizer,
    tokenizer::Tokenizer,
    SmallString,
};

/// A builder to create a Bert [`Tokenizer`].
pub struct Builder<N> {
    vocab: Arc<Vocab<N>>,
    // normalizer
    clean_text: bool,
    handle_chinese_chars: bool,
    lowercase: bool,
    decompose: bool,
    // model
    unk: SmallString,
    prefix: SmallString,
    max_chars: usize,
    // post-tokenizer
    cls: SmallString,
    sep: SmallString,
}

/// The potential errors of the [`Builder`].
#[derive(Debug, Display, Error)]
pub enum BuilderError {
    /// Failed to load a data file: {0}
    DataFile(#[from] IoError),
    /// Failed to parse the vocabulary: {0}
    Vocab(#[from] VocabError),
    /// Failed to build the word piece model: {0}
    Model(#[from] ModelError),
    /// Failed to build the post-tokenizer: {0}
    PostTokenizer(#[from] PostTokenizerError),
}

impl<N> Builder<N> {
    /// Creates a [`Tokenizer`] builder from a vocabulary file.
    ///
    /// The default settings are the same as for [`new()`].
    ///
    /// # Errors
    /// Fails if the file can't be opened or isn't a valid vocabulary.
    ///
    /// [`new()`]: Self::new
    pub fn from_file(vocab: impl AsRef<Path>) -> Result<Self, BuilderError>
    where
        N: FromPrimitive + Copy,
    {
        Self::new(BufReader::new(File::open(vocab)?))
    }

    /// Creates a [`Tokenizer`] builder from a vocabulary with one token per line.
    ///
    /// The default settings are the same as for [`from_vocab()`].
    ///
    /// # Errors
    /// Fails if the vocabulary can't be read or is invalid.
    ///
    /// [`from_vocab()`]: Self::from_vocab
    pub fn new(vocab: impl BufRead) -> Result<Self, BuilderError>
    where
        N: FromPrimitive + Copy,
    {
        Ok(Self::from_vocab(Arc::new(Vocab::parse(vocab)?)))
    }

    /// Creates a [`Tokenizer`] builder from a shared vocabulary.
    ///
    /// The default settings are:
    /// - A Bert normalizer which cleans the text, separates Chinese characters, lowercases and
    /// strips nonspacing marks without canonical decomposition.
    /// - A Bert word piece model with `"[UNK]"` unknown token, `"##"` continuing subword prefix
    /// and `200` maximum characters per word.
    /// - A Bert post-tokenizer with `"[CLS]"` class token and `"[SEP]"` separation token.
    pub fn from_vocab(vocab: Arc<Vocab<N>>) -> Self {
        Self {
            vocab,
            clean_text: true,
            handle_chinese_chars: true,
            lowercase: true,
            decompose: false,
            unk: "[UNK]".into(),
            prefix: "##".into(),
            max_chars: 200,
            cls: "[CLS]".into(),
            sep: "[SEP]".into(),
        }
    }

    /// Configures the normalizer.
    ///
    /// Lowercasing includes the removal of nonspacing marks. Defaults to `true` for all.
    pub fn with_normalizer(
        mut self,
        clean_text: bool,
        handle_chinese_chars: bool,
        lowercase: bool,
    ) -> Self {
        self.clean_text = clean_text;
        self.handle_chinese_chars = handle_chinese_chars;
        self.lowercase = lowercase;
        self
    }

    /// Toggles the canonical decomposition before nonspacing marks are removed.
    ///
    /// Only takes effect if lowercasing is enabled. Defaults to `false`.
    pub fn with_accent_decomposition(mut self, toggle: bool) -> Self {
        self.decompose = toggle;
        self
    }

    /// Configures the word piece model.
    ///
    /// Defaults to `"[UNK]"`, `"##"` and `200`.
    pub fn with_model(
        mut self,
        unk: impl AsRef<str>,
        prefix: impl AsRef<str>,
        max_chars: usize,
    ) -> Self {
        self.unk = unk.as_ref().into();
        self.prefix = prefix.as_ref().into();
        self.max_chars = max_chars;
        self
    }

    /// Configures the post-tokenizer.
    ///
    /// Defaults to `"[CLS]"` and `"[SEP]"`.
    pub fn with_post_tokenizer(mut self, cls: impl AsRef<str>, sep: impl AsRef<str>) -> Self {
        self.cls = cls.as_ref().into();
        self.sep = sep.as_ref().into();
        self
    }

    /// Builds the tokenizer.
    ///
    /// # Errors
    /// Fails if any of the special tokens is missing in the vocabulary or the continuing subword
    /// prefix is empty.
    pub fn build(self) -> Result<Tokenizer<N>, BuilderError>
    where
        N: Num + ToPrimitive + Copy,
    {
        let normalizer = Normalizer::new(
            self.clean_text,
            self.handle_chinese_chars,
            self.lowercase,
            self.decompose,
        );
        let post_tokenizer =
            PostTokenizer::new(self.cls.as_str(), self.sep.as_str(), self.vocab.as_ref())?;
        let model = Model::new(
            self.vocab,
            self.unk.as_str(),
            self.prefix.as_str(),
            self.max_chars,
        )?;
        debug!(
            "built tokenizer with vocabulary of {} tokens",
            model.vocab.len(),
        );

        Ok(Tokenizer {
            normalizer,
            pre_tokenizer: PreTokenizer,
            model,
            post_tokenizer,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const VOCAB: &str = "[PAD]\n[UNK]\n[CLS]\n[SEP]\n<s>\n</s>\n<unk>\nhello\n";

    #[test]
    fn test_defaults() {
        let tokenizer = Builder::<u32>::new(Cursor::new(VOCAB))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(tokenizer.vocab().len(), 8);
        assert_eq!(tokenizer.tokenize("Hello, World"), ["hello", "[UNK]", "[UNK]"]);
    }

    #[test]
    fn test_custom_special_tokens() {
        let tokenizer = Builder::<i64>::new(Cursor::new(VOCAB))
            .unwrap()
            .with_model("<unk>", "##", 100)
            .with_post_tokenizer("<s>", "</s>")
            .build()
            .unwrap();
        assert_eq!(
            tokenizer.tokenize_pair("hello world", "", 16).unwrap(),
            ["<s>", "hello", "<unk>", "</s>", "</s>"],
        );
        assert_eq!(
            tokenizer.encode("hello", 5).unwrap().ids(),
            [4, 7, 5, 5, 0],
        );
    }

    #[test]
    fn test_shared_vocab() {
        let vocab = Arc::new(Vocab::<u32>::parse(Cursor::new(VOCAB)).unwrap());
        let cased = Builder::from_vocab(vocab.clone())
            .with_normalizer(true, true, false)
            .build()
            .unwrap();
        let uncased = Builder::from_vocab(vocab.clone()).build().unwrap();
        assert_eq!(Arc::strong_count(&vocab), 3);
        assert_eq!(cased.tokenize("Hello"), ["[UNK]"]);
        assert_eq!(uncased.tokenize("Hello"), ["hello"]);
    }

    #[test]
    fn test_missing_tokens() {
        let builder = || Builder::<u32>::new(Cursor::new(VOCAB)).unwrap();
        assert!(matches!(
            builder().with_model("[UNKNOWN]", "##", 100).build(),
            Err(BuilderError::Model(ModelError::UnkToken)),
        ));
        assert!(matches!(
            builder().with_model("[UNK]", "", 100).build(),
            Err(BuilderError::Model(ModelError::Prefix)),
        ));
        assert!(matches!(
            builder().with_post_tokenizer("[BOS]", "[SEP]").build(),
            Err(BuilderError::PostTokenizer(PostTokenizerError::ClsToken)),
        ));
        assert!(matches!(
            builder().with_post_tokenizer("[CLS]", "[EOS]").build(),
            Err(BuilderError::PostTokenizer(PostTokenizerError::SepToken)),
        ));
    }

    #[test]
    fn test_invalid_vocab() {
        assert!(matches!(
            Builder::<u32>::new(Cursor::new("")),
            Err(BuilderError::Vocab(VocabError::Empty)),
        ));
        assert!(matches!(
            Builder::<u32>::new(Cursor::new("a\nb\na\n")),
            Err(BuilderError::Vocab(VocabError::Duplicate(token))) if token == "a",
        ));
        assert!(matches!(
            Builder::<u32>::from_file("missing/vocab.txt"),
            Err(BuilderError::DataFile(_)),
        ));
    }
}
