pub(crate) mod category;

use std::borrow::Cow;

use unicode_normalization_alignments::UnicodeNormalization;

use crate::normalizer::category::{is_cjk, is_control, is_nonspacing_mark, is_whitespace};

/// A Bert normalizer.
///
/// Cleans the sequence and isolates CJK ideographs on the whole sequence, folds the case and
/// strips the accents of each whitespace separated fragment.
#[derive(Clone, Debug)]
pub struct Normalizer {
    clean_text: bool,
    handle_chinese_chars: bool,
    lowercase: bool,
    decompose: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(true, true, true, false)
    }
}

impl Normalizer {
    pub(crate) fn new(
        clean_text: bool,
        handle_chinese_chars: bool,
        lowercase: bool,
        decompose: bool,
    ) -> Self {
        Self {
            clean_text,
            handle_chinese_chars,
            lowercase,
            decompose,
        }
    }

    /// Removes control characters and replaces all sorts of whitespace by ` `.
    fn clean_text<'s>(&self, sequence: Cow<'s, str>) -> Cow<'s, str> {
        let is_clean = |c: char| c == ' ' || !(is_control(c) || is_whitespace(c) || c == '\u{fffd}');
        if !self.clean_text || sequence.chars().all(is_clean) {
            return sequence;
        }

        sequence
            .chars()
            .filter_map(|c| {
                // tab, newline and carriage return count as whitespace, not control characters
                if is_whitespace(c) {
                    Some(' ')
                } else if c == '\0' || c == '\u{fffd}' || is_control(c) {
                    None
                } else {
                    Some(c)
                }
            })
            .collect::<String>()
            .into()
    }

    /// Puts spaces around CJK ideographs so they get split.
    fn handle_chinese_chars<'s>(&self, sequence: Cow<'s, str>) -> Cow<'s, str> {
        if !self.handle_chinese_chars || !sequence.chars().any(is_cjk) {
            return sequence;
        }

        let mut isolated = String::with_capacity(sequence.len());
        for c in sequence.chars() {
            if is_cjk(c) {
                isolated.push(' ');
                isolated.push(c);
                isolated.push(' ');
            } else {
                isolated.push(c);
            }
        }
        isolated.into()
    }

    /// Normalizes the whole sequence before it gets split.
    pub(crate) fn normalize<'s>(&self, sequence: &'s str) -> Cow<'s, str> {
        let sequence = self.clean_text(sequence.into());
        self.handle_chinese_chars(sequence)
    }

    /// Lowercases the fragment and strips its nonspacing marks.
    ///
    /// Marks are stripped after lowercasing, because lowercasing may produce new ones, eg. the
    /// dotted capital `İ` becomes `i` followed by a combining dot. If decomposition is enabled,
    /// precomposed characters are decomposed before stripping, which removes their accents too.
    pub(crate) fn fold<'s>(&self, fragment: &'s str) -> Cow<'s, str> {
        if !self.lowercase {
            return fragment.into();
        }

        let lowercased = fragment.to_lowercase();
        if self.decompose {
            lowercased
                .nfd()
                .map(|(c, _)| c)
                .filter(|&c| !is_nonspacing_mark(c))
                .collect::<String>()
                .into()
        } else if lowercased.chars().any(is_nonspacing_mark) {
            lowercased
                .chars()
                .filter(|&c| !is_nonspacing_mark(c))
                .collect::<String>()
                .into()
        } else {
            lowercased.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("a\tb\nc\rd"), "a b c d");
        assert_eq!(normalizer.normalize("a\u{0}b\u{fffd}c\u{200b}d"), "abcd");
        assert_eq!(normalizer.normalize("a\u{a0}b\u{3000}c"), "a b c");
        assert!(matches!(normalizer.normalize("clean text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_no_clean_text() {
        let normalizer = Normalizer::new(false, true, true, false);
        assert_eq!(normalizer.normalize("a\u{0}b\tc"), "a\u{0}b\tc");
    }

    #[test]
    fn test_chinese_chars() {
        let normalizer = Normalizer::default();
        assert_eq!(
            normalizer.normalize("野口里佳 Noguchi Rika"),
            " 野  口  里  佳  Noguchi Rika",
        );
        assert_eq!(normalizer.normalize("ありがとう"), "ありがとう");

        let normalizer = Normalizer::new(true, false, true, false);
        assert_eq!(normalizer.normalize("野口"), "野口");
    }

    #[test]
    fn test_fold() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.fold("HeLLo"), "hello");
        // combining acute accent
        assert_eq!(normalizer.fold("Cafe\u{301}"), "cafe");
        // precomposed characters are not decomposed by default
        assert_eq!(normalizer.fold("Café"), "café");
        assert_eq!(normalizer.fold("İ"), "i");
    }

    #[test]
    fn test_fold_decomposed() {
        let normalizer = Normalizer::new(true, true, true, true);
        assert_eq!(normalizer.fold("Café"), "cafe");
        assert_eq!(normalizer.fold("Ŝtrăße"), "straße");
    }

    #[test]
    fn test_no_fold() {
        let normalizer = Normalizer::new(true, true, false, true);
        assert_eq!(normalizer.fold("Cafe\u{301}"), "Cafe\u{301}");
    }
}
