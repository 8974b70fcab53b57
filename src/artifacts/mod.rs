//! Diff data structures and algorithms
//!
//! This module contains the core diffing machinery:
//!
//! - `diff`: string-level diff engines (Myers, characters, words)
//! - `patch`: tree alignment and text run patching
//! - `render`: presentation of annotated documents and edit scripts

pub mod diff;
pub mod patch;
pub mod render;
