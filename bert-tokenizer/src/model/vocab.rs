use std::{
    collections::HashMap,
    io::{BufRead, Error as IoError},
};

use displaydoc::Display;
use log::debug;
use num_traits::{FromPrimitive, ToPrimitive};
use thiserror::Error;

/// A word piece vocabulary.
///
/// Maps tokens to dense ids starting at zero and back. The vocabulary is immutable once it has
/// been created and can be shared read-only between tokenizers.
#[derive(Debug)]
pub struct Vocab<N> {
    ids: HashMap<String, N>,
    tokens: Vec<String>,
}

/// The potential errors of the vocabulary.
#[derive(Debug, Display, Error)]
pub enum VocabError {
    /// Failed to read the vocabulary: {0}
    Io(#[from] IoError),
    /// The vocabulary is empty
    Empty,
    /// The token {0:?} occurs more than once in the vocabulary
    Duplicate(String),
    /// The id of the token at index {0} overflows the id type
    IdOverflow(usize),
}

impl<N> Vocab<N> {
    /// Parses a vocabulary with one token per line.
    ///
    /// The line index is the id of the token. Reading stops at the first blank line.
    pub fn parse(vocab: impl BufRead) -> Result<Self, VocabError>
    where
        N: FromPrimitive + Copy,
    {
        let mut tokens = Vec::new();
        for line in vocab.lines() {
            let line = line?;
            let token = line.trim();
            if token.is_empty() {
                break;
            }
            tokens.push(token.to_string());
        }
        Self::from_tokens(tokens)
    }

    /// Creates a vocabulary from tokens ordered by their ids.
    pub fn from_tokens(
        tokens: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, VocabError>
    where
        N: FromPrimitive + Copy,
    {
        let tokens = tokens.into_iter().map(Into::into).collect::<Vec<String>>();
        if tokens.is_empty() {
            return Err(VocabError::Empty);
        }

        let mut ids = HashMap::with_capacity(tokens.len());
        for (idx, token) in tokens.iter().enumerate() {
            let id = N::from_usize(idx).ok_or(VocabError::IdOverflow(idx))?;
            if ids.insert(token.clone(), id).is_some() {
                return Err(VocabError::Duplicate(token.clone()));
            }
        }
        debug!("parsed vocabulary of {} tokens", tokens.len());

        Ok(Self { ids, tokens })
    }

    /// Gets the id of the token.
    pub fn id(&self, token: &str) -> Option<N>
    where
        N: Copy,
    {
        self.ids.get(token).copied()
    }

    /// Gets the token of the id.
    pub fn token(&self, id: N) -> Option<&str>
    where
        N: ToPrimitive,
    {
        id.to_usize()
            .and_then(|idx| self.tokens.get(idx))
            .map(String::as_str)
    }

    /// Checks whether the token is in the vocabulary.
    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Gets the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Checks whether this is empty.
    ///
    /// A successfully created vocabulary is never empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse() {
        let vocab = Vocab::<u32>::parse(Cursor::new("[PAD]\n  [UNK] \nhello\r\n##lo\n")).unwrap();
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.id("[PAD]"), Some(0));
        assert_eq!(vocab.id("[UNK]"), Some(1));
        assert_eq!(vocab.id("hello"), Some(2));
        assert_eq!(vocab.id("##lo"), Some(3));
        assert_eq!(vocab.id("world"), None);
        assert_eq!(vocab.token(2), Some("hello"));
        assert_eq!(vocab.token(4), None);
        assert!(vocab.contains("##lo"));
        assert!(!vocab.contains("lo"));
    }

    #[test]
    fn test_parse_stops_at_blank_line() {
        let vocab = Vocab::<u32>::parse(Cursor::new("a\nb\n   \nc\n")).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(!vocab.contains("c"));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            Vocab::<u32>::parse(Cursor::new("")),
            Err(VocabError::Empty),
        ));
        assert!(matches!(
            Vocab::<u32>::parse(Cursor::new("\na\n")),
            Err(VocabError::Empty),
        ));
    }

    #[test]
    fn test_duplicate() {
        assert!(matches!(
            Vocab::<u32>::from_tokens(vec!["a", "b", "a"]),
            Err(VocabError::Duplicate(token)) if token == "a",
        ));
    }

    #[test]
    fn test_id_overflow() {
        let tokens = (0..300).map(|idx| idx.to_string());
        assert!(matches!(
            Vocab::<u8>::from_tokens(tokens),
            Err(VocabError::IdOverflow(256)),
        ));
    }

    #[test]
    fn test_signed_ids() {
        let vocab = Vocab::<i64>::from_tokens(vec!["a", "b"]).unwrap();
        assert_eq!(vocab.id("b"), Some(1));
        assert_eq!(vocab.token(1), Some("b"));
        assert_eq!(vocab.token(-1), None);
    }
}
