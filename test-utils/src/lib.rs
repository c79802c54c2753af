//! Shared fixtures for the tokenizer tests.

pub mod vocab;
