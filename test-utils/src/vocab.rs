use std::io::{Result, Write};

use tempfile::NamedTempFile;

/// Tokens of the uncased Bert vocabulary at their reference ids.
///
/// Contains the special tokens and everything needed to tokenize a few English sentences, but
/// none of the longer pieces a greedy segmentation would prefer, eg. `horny`.
pub const UNCASED_TOKENS: &[(usize, &str)] = &[
    (0, "[PAD]"),
    (100, "[UNK]"),
    (101, "[CLS]"),
    (102, "[SEP]"),
    (103, "[MASK]"),
    (999, "!"),
    (1005, "'"),
    (1010, ","),
    (1012, "."),
    (1029, "?"),
    (1037, "a"),
    (1045, "i"),
    (1055, "s"),
    (1056, "t"),
    (1996, "the"),
    (1997, "of"),
    (1998, "and"),
    (1999, "in"),
    (2000, "to"),
    (2003, "is"),
    (2009, "it"),
    (2015, "##s"),
    (2017, "you"),
    (2023, "this"),
    (2026, "my"),
    (2079, "do"),
    (2100, "##y"),
    (2115, "your"),
    (2129, "how"),
    (2491, "control"),
    (6699, "emotions"),
    (7109, "horn"),
    (9961, "##iness"),
];

/// Gets the uncased vocabulary with one token per line.
///
/// The gaps between the reference ids are filled with unused placeholder tokens.
pub fn uncased() -> String {
    let len = UNCASED_TOKENS.last().map_or(0, |(id, _)| id + 1);
    let mut lines = (0..len)
        .map(|id| format!("[unused{}]", id))
        .collect::<Vec<_>>();
    for (id, token) in UNCASED_TOKENS {
        lines[*id] = token.to_string();
    }

    lines.join("\n") + "\n"
}

/// Writes the uncased vocabulary to a temporary file.
pub fn uncased_file() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(uncased().as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Gets the reference id of the token.
///
/// # Panics
/// Panics if the token isn't part of the fixture.
pub fn id(token: &str) -> usize {
    UNCASED_TOKENS
        .iter()
        .find_map(|(id, t)| (*t == token).then(|| *id))
        .unwrap_or_else(|| panic!("missing token {:?} in the vocabulary fixture", token))
}
