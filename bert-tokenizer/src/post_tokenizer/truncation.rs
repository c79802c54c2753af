use displaydoc::Display;
use log::debug;
use thiserror::Error;

use crate::post_tokenizer::ADDED_TOKENS;

/// A fixed-length truncation strategy for pairs of sequences.
#[derive(Clone, Copy, Debug)]
pub struct Truncation {
    budget: usize,
}

/// The potential errors of the truncation strategy.
#[derive(Debug, Display, Error)]
pub enum TruncationError {
    /// The maximum sequence length {len} leaves no room for the special tokens
    SeqLen { len: usize },
}

impl Truncation {
    /// Creates a truncation strategy for the maximum sequence length.
    ///
    /// The length includes the special tokens added by the post-tokenizer.
    pub(crate) fn fixed(len: usize) -> Result<Self, TruncationError> {
        len.checked_sub(ADDED_TOKENS)
            .map(|budget| Self { budget })
            .ok_or(TruncationError::SeqLen { len })
    }

    /// Truncates the pair of sequences until they fit into the budget together.
    ///
    /// Tokens are dropped one at a time from the end of the currently longer sequence, from the
    /// second sequence if both are equally long.
    pub(crate) fn truncate<T>(&self, mut first: Vec<T>, mut second: Vec<T>) -> (Vec<T>, Vec<T>) {
        let (mut first_len, mut second_len) = (first.len(), second.len());
        while first_len + second_len > self.budget {
            if first_len > second_len {
                first_len -= 1;
            } else {
                second_len -= 1;
            }
        }

        if first_len < first.len() || second_len < second.len() {
            debug!(
                "truncated pair by {} and {} tokens",
                first.len() - first_len,
                second.len() - second_len,
            );
            first.truncate(first_len);
            second.truncate(second_len);
        }

        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_seq_len() {
        assert!(matches!(
            Truncation::fixed(2),
            Err(TruncationError::SeqLen { len: 2 }),
        ));
        assert!(matches!(
            Truncation::fixed(0),
            Err(TruncationError::SeqLen { len: 0 }),
        ));
        assert_eq!(Truncation::fixed(3).unwrap().budget, 0);
        assert_eq!(Truncation::fixed(128).unwrap().budget, 125);
    }

    #[rstest(
        first,
        second,
        len,
        expected,
        case(5, 3, 11, (5, 3)),
        case(5, 3, 9, (3, 3)),
        case(4, 4, 10, (4, 3)),
        case(6, 2, 7, (2, 2)),
        case(3, 4, 8, (3, 2)),
        case(10, 0, 8, (5, 0)),
        case(0, 10, 8, (0, 5)),
        case(3, 3, 3, (0, 0)),
        case(0, 0, 3, (0, 0))
    )]
    fn test_truncate(first: usize, second: usize, len: usize, expected: (usize, usize)) {
        let (first, second) =
            Truncation::fixed(len).unwrap().truncate(vec![1; first], vec![2; second]);
        assert_eq!((first.len(), second.len()), expected);
        assert!(first.iter().all(|&token| token == 1));
        assert!(second.iter().all(|&token| token == 2));
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        let (first, second) = Truncation::fixed(7)
            .unwrap()
            .truncate(vec!["a", "b", "c", "d"], vec!["e", "f", "g"]);
        assert_eq!(first, ["a", "b"]);
        assert_eq!(second, ["e", "f"]);
    }
}
