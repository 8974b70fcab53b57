//! Document patching
//!
//! This module merges an old and a new document tree into one annotated tree:
//!
//! - `options`: knobs for a document diff (granularity, depth limit)
//! - `text_run`: diffing a run of text leaves while projecting their marks
//! - `tree_patch`: aligning children recursively and patching matched pairs

pub mod options;
pub mod text_run;
pub mod tree_patch;
