//! Text diff engines
//!
//! This module implements the string-level half of document diffing:
//!
//! - `myers`: Myers' O(ND) shortest edit script over arbitrary sequences
//! - `edit_script`: segments, edit scripts and segment filters
//! - `char_diff`: character-level edit scripts between two strings
//! - `tokenizer`: splitting text into word, whitespace and punctuation runs
//! - `word_diff`: token-level diffing refined to characters inside changed pairs

pub mod char_diff;
pub mod edit_script;
pub mod myers;
pub mod tokenizer;
pub mod word_diff;
