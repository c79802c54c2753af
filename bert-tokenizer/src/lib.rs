#![cfg_attr(doc, forbid(broken_intra_doc_links, private_intra_doc_links))]
//! A Bert tokenizer which converts sequences into word pieces and sequence pairs into encodings.
//!
//! The tokenizer is based on a word piece vocabulary and consists of a Bert normalizer, a Bert
//! pre-tokenizer, a Bert word piece model and a Bert post-tokenizer including truncation and
//! padding. The ids can be of any numerical data type which implements
//! [`Num`]` + `[`FromPrimitive`]` + `[`ToPrimitive`]` + `[`Copy`].
//!
//! The normalizer is configurable by:
//! - Cleans any control characters and replaces all sorts of whitespace by ` `.
//! - Separates Chinese characters by whitespace so they get split.
//! - Lowercases characters and strips nonspacing marks.
//! - Decomposes characters before the nonspacing marks are stripped.
//!
//! The pre-tokenizer is not configurable.
//!
//! The word piece model is configurable by:
//! - The unknown token.
//! - The continuing subword prefix.
//! - The maximum number of characters per word.
//!
//! The post-tokenizer is configurable by:
//! - The class token.
//! - The separation token.
//!
//! The truncation and padding length is chosen per call.
//!
//! ```
//! use std::io::Cursor;
//!
//! use bert_tokenizer::Builder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let vocab = "[PAD]\n[UNK]\n[CLS]\n[SEP]\nthis\nis\na\nsequence\n.\n";
//!     let tokenizer = Builder::<u32>::new(Cursor::new(vocab))?
//!         .with_normalizer(true, true, true)
//!         .with_model("[UNK]", "##", 200)
//!         .with_post_tokenizer("[CLS]", "[SEP]")
//!         .build()?;
//!
//!     let tokens = tokenizer.tokenize("This is a sequence.");
//!     assert_eq!(tokenizer.to_ids(&tokens)?, [4, 5, 6, 7, 8]);
//!
//!     let encoding = tokenizer.encode_pair("This is a sequence.", "And another one!", 16)?;
//!     assert_eq!(encoding.len(), 16);
//!
//!     Ok(())
//! }
//! ```
//!
//! [`Num`]: num_traits::Num
//! [`FromPrimitive`]: num_traits::FromPrimitive
//! [`ToPrimitive`]: num_traits::ToPrimitive

mod builder;
mod model;
mod normalizer;
mod post_tokenizer;
mod pre_tokenizer;
mod tokenizer;

pub use crate::{
    builder::{Builder, BuilderError},
    model::{
        vocab::{Vocab, VocabError},
        ModelError,
    },
    post_tokenizer::{
        encoding::Encoding,
        padding::PaddingError,
        truncation::TruncationError,
        PostTokenizerError,
    },
    tokenizer::{Tokenizer, TokenizerError},
};

/// A stack allocated string with a maximum length of eight bytes.
type SmallString = smallstr::SmallString<[u8; 8]>;
