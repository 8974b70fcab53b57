//! Diff-and-annotate for rich-text document trees
//!
//! Two versions of a structured document (ProseMirror-style JSON trees of
//! typed nodes, with text leaves carrying marks) are merged into a single
//! tree in which every inserted or deleted piece of text is a text leaf
//! tagged with a `diffMark` mark. Unchanged subtrees are shared with the old
//! document.
//!
//! - `domain`: nodes, marks, diff tags and errors
//! - `artifacts`: the diff engines, the tree patcher and renderers
//! - `commands`: the command-line front end

pub mod artifacts;
pub mod commands;
pub mod domain;

pub use artifacts::diff::char_diff::diff_chars;
pub use artifacts::diff::edit_script::{DiffFilter, EditScript, Segment, SegmentKind};
pub use artifacts::diff::tokenizer::{Token, TokenClass, tokenize};
pub use artifacts::diff::word_diff::diff_words;
pub use artifacts::patch::options::DiffOptions;
pub use artifacts::patch::text_run::patch_text_run;
pub use artifacts::patch::tree_patch::TreePatcher;
pub use domain::error::{DiffError, Result};
pub use domain::mark::{DIFF_MARK_TYPE, DiffKind, DiffTag, Granularity, Mark};
pub use domain::node::{Attrs, Node, NodeType};

/// Merges `old` and `new` into one annotated document.
///
/// Fails without producing output if either tree is malformed, nests deeper
/// than `options.max_depth`, or the roots differ in type.
pub fn diff(old: &Node, new: &Node, options: &DiffOptions) -> Result<Node> {
    tracing::debug!(
        root = %old.node_type,
        granularity = %options.granularity,
        max_depth = options.max_depth,
        "diffing documents"
    );

    TreePatcher::new(*options).patch(old, new)
}
