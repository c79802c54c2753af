use crate::normalizer::{category::is_punctuation, Normalizer};

/// A Bert pre-tokenizer.
///
/// Splits a normalized sequence into coarse tokens: runs of characters separated by whitespace
/// and isolated punctuation characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreTokenizer;

impl PreTokenizer {
    /// Splits the sequence on ascii spaces and discards empty fragments.
    pub(crate) fn split_whitespace(sequence: &str) -> impl Iterator<Item = &str> {
        sequence.split(' ').filter(|fragment| !fragment.is_empty())
    }

    /// Splits the fragment on punctuation, each punctuation character becomes its own split.
    fn split_punctuation(fragment: &str, splits: &mut Vec<String>) {
        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            if is_punctuation(c) {
                if start < idx {
                    splits.push(fragment[start..idx].to_string());
                }
                let end = idx + c.len_utf8();
                splits.push(fragment[idx..end].to_string());
                start = end;
            }
        }
        if start < fragment.len() {
            splits.push(fragment[start..].to_string());
        }
    }

    /// Pre-tokenizes the normalized sequence.
    ///
    /// Each whitespace separated fragment is folded by the normalizer before it is split on
    /// punctuation.
    pub(crate) fn pre_tokenize(&self, sequence: &str, normalizer: &Normalizer) -> Vec<String> {
        let mut splits = Vec::new();
        for fragment in Self::split_whitespace(sequence) {
            let fragment = normalizer.fold(fragment);
            Self::split_punctuation(fragment.as_ref(), &mut splits);
        }
        splits
    }
}
