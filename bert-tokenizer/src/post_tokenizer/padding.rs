use std::iter;

use displaydoc::Display;
use thiserror::Error;

/// A fixed-length padding strategy.
#[derive(Clone, Copy, Debug)]
pub struct Padding {
    len: usize,
}

/// The potential errors of the padding strategy.
#[derive(Debug, Display, Error)]
pub enum PaddingError {
    /// The sequence of length {len} exceeds the padding length {max}
    Overflow { len: usize, max: usize },
}

impl Padding {
    /// Creates a padding strategy for the fixed length.
    pub(crate) fn fixed(len: usize) -> Self {
        Self { len }
    }

    /// Gets the padded length.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Checks that a sequence of the given length can be padded without loosing any tokens.
    pub(crate) fn check(&self, len: usize) -> Result<usize, PaddingError> {
        self.len
            .checked_sub(len)
            .ok_or(PaddingError::Overflow { len, max: self.len })
    }

    /// Pads the sequence on the right with the value.
    ///
    /// Padding never truncates, a sequence longer than the padding length is an error.
    pub(crate) fn pad<T>(&self, mut sequence: Vec<T>, value: T) -> Result<Vec<T>, PaddingError>
    where
        T: Clone,
    {
        let missing = self.check(sequence.len())?;
        sequence.extend(iter::repeat(value).take(missing));
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(Padding::fixed(5).pad(vec![1, 2, 3], 0).unwrap(), [1, 2, 3, 0, 0]);
        assert_eq!(Padding::fixed(3).pad(vec![1, 2, 3], 0).unwrap(), [1, 2, 3]);
        assert_eq!(Padding::fixed(2).pad(Vec::<u32>::new(), 7).unwrap(), [7, 7]);
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            Padding::fixed(2).pad(vec![1, 2, 3], 0),
            Err(PaddingError::Overflow { len: 3, max: 2 }),
        ));
    }
}
