// src/input/mod.rs

//! Command input: bounded line reading and tokenization.
//!
//! - [`reader`] turns an async byte stream into bounded [`RawLine`]s.
//! - [`tokenize`] turns a raw line into an [`ArgVector`].

pub mod reader;
pub mod tokenize;

pub use reader::{LineReader, RawLine};
pub use tokenize::{ArgVector, tokenize};
