//! CLI command implementations
//!
//! Every command is an `impl Session` block writing to the session's output:
//!
//! - `session`: the output sink shared by all commands
//! - `diff`: merging two JSON documents into one annotated document
//! - `words`: edit scripts between two strings
//! - `tokenize`: word, whitespace and punctuation runs of a string

pub mod diff;
pub mod session;
pub mod tokenize;
pub mod words;
